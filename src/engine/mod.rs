//! Engine: the animation and session layer shared by every game.
//!
//! Tweens, keyframe sequences and entities turn per-tick updates into
//! drawable primitives; the session runs the title ↔ active state machine.
//! It never deals with terminals, ANSI codes, or cell grids.

pub mod audio;
pub mod entity;
pub mod random;
pub mod sequence;
pub mod session;
pub mod tween;

pub use audio::{AudioController, AudioSink};
pub use entity::Entity;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use session::{Game, Outcome, Phase, PromptDrift, Round, Rules, Session, TitleScreen};

use crate::types::Outputs;

/// Emit an object's primitives for the current frame.
pub trait Render {
    fn render(&self, out: &mut Outputs);
}
