//! The two games, each a set of `Rules` run by a generic `Session`.

pub mod adrift;
pub mod vertices;

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::config::ArcadeConfig;
use crate::engine::{AudioController, Game, RandomSource, SeededRandom, Session};
use crate::types::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Adrift,
    Vertices,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::Adrift, GameKind::Vertices];

    /// Build a ready-to-tick session, seeded from `seed` when given.
    pub fn build(self, config: &ArcadeConfig, grid: Grid, seed: Option<u64>) -> Box<dyn Game> {
        let rng: Box<dyn RandomSource> = Box::new(SeededRandom::new(seed));
        self.build_with(config, grid, rng)
    }

    pub fn build_with(self, config: &ArcadeConfig, grid: Grid, rng: Box<dyn RandomSource>) -> Box<dyn Game> {
        let audio = AudioController::new(config.music, config.sound);
        match self {
            GameKind::Adrift => Box::new(Session::new(adrift::Adrift::new(&config.adrift, grid), grid, audio, rng)),
            GameKind::Vertices => {
                Box::new(Session::new(vertices::Vertices::new(&config.vertices, grid), grid, audio, rng))
            }
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameKind::Adrift => "adrift",
            GameKind::Vertices => "vertices",
        })
    }
}

impl FromStr for GameKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "adrift" => Ok(GameKind::Adrift),
            "vertices" => Ok(GameKind::Vertices),
            other => bail!("unknown game '{other}' (expected adrift or vertices)"),
        }
    }
}
