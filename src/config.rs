use std::path::PathBuf;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Ticks per second.
    pub tick_rate: u32,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub music: bool,
    pub sound: bool,
    /// Ring the terminal bell for sound effects.
    pub bell: bool,
    pub vertices: VerticesConfig,
    pub adrift: AdriftConfig,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticesConfig {
    pub play_seconds: u32,
    pub target_shapes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdriftConfig {
    pub play_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub toggle_music: String,
    pub toggle_sound: String,
    pub quit: String,
    #[serde(default = "default_quit_alt")]
    pub quit_alt: String,
}

fn default_quit_alt() -> String { "Esc".into() }

impl Default for ArcadeConfig {
    fn default() -> Self {
        ArcadeConfig {
            tick_rate: 60,
            seed: None,
            log_file: None,
            music: true,
            sound: true,
            bell: false,
            vertices: VerticesConfig::default(),
            adrift: AdriftConfig::default(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Default for VerticesConfig {
    fn default() -> Self {
        VerticesConfig {
            play_seconds: 20,
            target_shapes: 10,
        }
    }
}

impl Default for AdriftConfig {
    fn default() -> Self {
        AdriftConfig { play_seconds: 20 }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            toggle_music: "m".into(),
            toggle_sound: "s".into(),
            quit: "q".into(),
            quit_alt: default_quit_alt(),
        }
    }
}

impl ArcadeConfig {
    /// Read the user's config. A missing file yields the defaults; an
    /// unreadable or invalid one is an error the caller may fall back from.
    pub fn try_load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        let json = match std::fs::read_to_string(&config_path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", config_path.display())),
        };
        Self::parse(&json).with_context(|| format!("Invalid config {}", config_path.display()))
    }

    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("teeny-arcade");
        path.push("config.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        if !event.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        return rest.chars().next().is_some_and(|c| event.code == KeyCode::Char(c));
    }

    // Plain bindings never fire with Ctrl or Alt held.
    if event.modifiers.contains(KeyModifiers::CONTROL) || event.modifiers.contains(KeyModifiers::ALT) {
        return false;
    }

    match binding {
        "Esc" => event.code == KeyCode::Esc,
        "Enter" => event.code == KeyCode::Enter,
        "Space" => event.code == KeyCode::Char(' '),
        "Tab" => event.code == KeyCode::Tab,
        s => s.chars().next().is_some_and(|c| event.code == KeyCode::Char(c)),
    }
}
