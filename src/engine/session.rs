//! Generic title ↔ active session shared by both games.
//!
//! A `Session` owns everything that is the same in every game: the phase, the
//! round's start tick, the audio controller and its icons, the title screen
//! and the random source. The game itself only supplies a `Rules`
//! implementation.

use log::{debug, info};
use serde::Serialize;
use serde_json::json;

use super::Render;
use super::audio::AudioController;
use super::entity::{Entity, Visual};
use super::random::RandomSource;
use crate::types::{Align, FrameContext, Grid, Outputs, Point, Rgba};

const ICON_SIZE: f32 = 50.0;
const ICON_TINTS: [Rgba; 2] = [Rgba::new(255.0, 200.0, 200.0, 128.0), Rgba::new(200.0, 200.0, 255.0, 128.0)];
const ICON_CYCLE: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Title,
    Active,
}

/// What the host drives once per tick.
pub trait Game {
    fn name(&self) -> &'static str;
    fn phase(&self) -> Phase;
    fn audio(&self) -> &AudioController;
    fn tick(&mut self, ctx: &FrameContext, out: &mut Outputs);
    fn toggle_music(&mut self, out: &mut Outputs);
    fn toggle_sound(&mut self, out: &mut Outputs);
    /// Centre of the start button, for scripted runs.
    fn start_point(&self) -> Point;
    fn dump(&self) -> serde_json::Value;
    fn shutdown(&mut self, out: &mut Outputs);
}

/// Mutable view of the session handed to the rules during a round.
pub struct Round<'a> {
    pub frame: &'a FrameContext,
    /// Ticks since the round started.
    pub elapsed: u64,
    pub rng: &'a mut dyn RandomSource,
    pub audio: &'a mut AudioController,
    pub out: &'a mut Outputs,
}

impl Round<'_> {
    pub fn play_effect(&mut self, id: &str) {
        self.audio.play_effect(id, &mut *self.out);
    }
}

/// How a round ended, with the lines to show on the title screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub prompts: Vec<String>,
}

/// The game-specific half of a session.
pub trait Rules {
    /// Asset prefix, e.g. `vertices`.
    fn name(&self) -> &'static str;
    fn background(&self) -> Rgba;
    fn title_music(&self) -> &'static str;
    fn play_music(&self) -> &'static str;
    fn title_screen(&self, grid: Grid) -> TitleScreen;

    /// Reset everything for a new round.
    fn start(&mut self, round: &mut Round<'_>);

    /// One active tick; returns the outcome once the round is over.
    fn update(&mut self, round: &mut Round<'_>) -> Option<Outcome>;

    fn render(&self, ctx: &FrameContext, elapsed: u64, out: &mut Outputs);

    /// Runs every tick in both phases.
    fn update_backdrop(&mut self, _ctx: &FrameContext, _rng: &mut dyn RandomSource) {}

    fn render_backdrop(&self, _ctx: &FrameContext, _out: &mut Outputs) {}

    /// Called after the frame has been rendered.
    fn end_frame(&mut self) {}

    fn dump(&self) -> serde_json::Value;
}

/// Drifting behaviour for title prompts: when a prompt comes to rest it picks
/// a new spot near `anchor`, stacked `spacing` apart.
#[derive(Debug, Clone, Copy)]
pub struct PromptDrift {
    pub anchor: Point,
    pub spread: Point,
    pub spacing: f32,
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct TitleScreen {
    pub logo: Option<Entity>,
    pub button: Entity,
    pub prompts: Vec<Entity>,
    pub drift: Option<PromptDrift>,
}

impl TitleScreen {
    pub fn update(&mut self, rng: &mut dyn RandomSource) {
        if let Some(logo) = &mut self.logo {
            logo.update();
        }

        if let Some(drift) = self.drift {
            let x = drift.anchor.x + rng.spread(drift.spread.x);
            let y = drift.anchor.y + rng.spread(drift.spread.y);
            for (idx, prompt) in self.prompts.iter_mut().enumerate() {
                if !prompt.is_moving() {
                    prompt.set_location(x, y - idx as f32 * drift.spacing, drift.speed);
                }
            }
        }
        for prompt in &mut self.prompts {
            prompt.update();
        }

        self.button.update();
    }

    pub fn start_clicked(&self, ctx: &FrameContext) -> bool {
        ctx.click.is_some_and(|p| self.button.hit_test(p))
    }

    /// Replace the leading prompts' text, leaving any others untouched.
    pub fn set_prompts(&mut self, lines: &[String]) {
        for (prompt, line) in self.prompts.iter_mut().zip(lines) {
            prompt.set_text(line.clone());
        }
    }

    pub fn prompt_texts(&self) -> Vec<String> {
        self.prompts
            .iter()
            .filter_map(|p| match p.visual() {
                Visual::Label { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Render for TitleScreen {
    fn render(&self, out: &mut Outputs) {
        if let Some(logo) = &self.logo {
            logo.render(out);
        }
        for prompt in &self.prompts {
            prompt.render(out);
        }
        self.button.render(out);
    }
}

pub struct Session<R: Rules> {
    rules: R,
    phase: Phase,
    start_tick: u64,
    audio: AudioController,
    title: TitleScreen,
    music_icon: Entity,
    sound_icon: Entity,
    version: Entity,
    rng: Box<dyn RandomSource>,
}

impl<R: Rules> Session<R> {
    pub fn new(rules: R, grid: Grid, mut audio: AudioController, rng: Box<dyn RandomSource>) -> Self {
        audio.cue(rules.title_music());

        let icon = |path: String, x: f32| {
            let mut e = Entity::sprite(path, ICON_SIZE, ICON_SIZE);
            e.set_location(x, 10.0, 0.0);
            e.color_cycle(ICON_TINTS.to_vec(), ICON_CYCLE);
            e
        };
        let sound_icon = icon(audio.sound_icon(rules.name()), grid.w - 60.0);
        let music_icon = icon(audio.music_icon(rules.name()), grid.w - 110.0);

        let mut version = Entity::label(concat!("Version ", env!("CARGO_PKG_VERSION")), 20.0, Align::Left);
        version.set_location(10.0, 25.0, 0.0);
        version.set_color(Rgba::new(200.0, 200.0, 200.0, 128.0), 0.0);

        let title = rules.title_screen(grid);
        Session {
            rules,
            phase: Phase::Title,
            start_tick: 0,
            audio,
            title,
            music_icon,
            sound_icon,
            version,
            rng,
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    pub fn title(&self) -> &TitleScreen {
        &self.title
    }

    pub fn audio(&self) -> &AudioController {
        &self.audio
    }

    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }

    fn transition(&mut self, to: Phase) {
        debug_assert_ne!(self.phase, to, "{} is already in {to:?}", self.rules.name());
        info!("{}: {:?} -> {:?}", self.rules.name(), self.phase, to);
        self.phase = to;
    }

    fn update(&mut self, ctx: &FrameContext, out: &mut Outputs) {
        self.audio.update(out);
        self.rules.update_backdrop(ctx, self.rng.as_mut());

        if let Some(click) = ctx.click {
            debug!("click at ({:.0}, {:.0})", click.x, click.y);
            if self.music_icon.hit_test(click) {
                self.toggle_music(out);
            }
            if self.sound_icon.hit_test(click) {
                self.toggle_sound(out);
            }
        }
        self.music_icon.update();
        self.sound_icon.update();

        match self.phase {
            Phase::Title => self.update_title(ctx, out),
            Phase::Active => self.update_active(ctx, out),
        }
    }

    fn update_title(&mut self, ctx: &FrameContext, out: &mut Outputs) {
        self.title.update(self.rng.as_mut());
        if !self.title.start_clicked(ctx) {
            return;
        }

        self.start_tick = ctx.tick;
        let mut round = Round {
            frame: ctx,
            elapsed: 0,
            rng: self.rng.as_mut(),
            audio: &mut self.audio,
            out: &mut *out,
        };
        self.rules.start(&mut round);
        self.switch_music(self.rules.play_music(), out);
        self.transition(Phase::Active);
    }

    fn update_active(&mut self, ctx: &FrameContext, out: &mut Outputs) {
        let mut round = Round {
            frame: ctx,
            elapsed: self.elapsed(ctx),
            rng: self.rng.as_mut(),
            audio: &mut self.audio,
            out: &mut *out,
        };
        let Some(outcome) = self.rules.update(&mut round) else {
            return;
        };

        info!(
            "{}: round over ({}) after {} ticks",
            self.rules.name(),
            if outcome.success { "success" } else { "failure" },
            self.elapsed(ctx)
        );
        self.title.set_prompts(&outcome.prompts);
        self.switch_music(self.rules.title_music(), out);
        self.transition(Phase::Title);
    }

    /// Change track, leaving a track that is already current alone.
    fn switch_music(&mut self, id: &str, out: &mut Outputs) {
        if self.audio.track() != Some(id) {
            self.audio.play_music(id, out);
        }
    }

    fn elapsed(&self, ctx: &FrameContext) -> u64 {
        ctx.tick.saturating_sub(self.start_tick)
    }

    fn render(&self, ctx: &FrameContext, out: &mut Outputs) {
        self.rules.render_backdrop(ctx, out);
        match self.phase {
            Phase::Title => self.title.render(out),
            Phase::Active => self.rules.render(ctx, self.elapsed(ctx), out),
        }
        self.music_icon.render(out);
        self.sound_icon.render(out);
        self.version.render(out);
    }
}

impl<R: Rules> Game for Session<R> {
    fn name(&self) -> &'static str {
        self.rules.name()
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn audio(&self) -> &AudioController {
        &self.audio
    }

    fn tick(&mut self, ctx: &FrameContext, out: &mut Outputs) {
        out.background = self.rules.background();
        self.update(ctx, out);
        self.render(ctx, out);
        self.rules.end_frame();
    }

    fn toggle_music(&mut self, out: &mut Outputs) {
        self.audio.toggle_music(out);
        self.music_icon.set_path(self.audio.music_icon(self.rules.name()));
        info!("music {}", if self.audio.music() { "on" } else { "off" });
    }

    fn toggle_sound(&mut self, out: &mut Outputs) {
        self.audio.toggle_sound(out);
        self.sound_icon.set_path(self.audio.sound_icon(self.rules.name()));
        info!("sound {}", if self.audio.sound() { "on" } else { "off" });
    }

    fn start_point(&self) -> Point {
        self.title.button.center()
    }

    fn dump(&self) -> serde_json::Value {
        json!({
            "game": self.rules.name(),
            "phase": self.phase,
            "start_tick": self.start_tick,
            "audio": self.audio,
            "prompts": self.title.prompt_texts(),
            "rules": self.rules.dump(),
        })
    }

    fn shutdown(&mut self, out: &mut Outputs) {
        self.audio.stop(out);
        info!("{}: shut down", self.rules.name());
    }
}
