//! Keyframe sequencer. Walks one channel group through a list of targets.

use serde::Serialize;

use super::tween::{Group, TweenState};
use crate::types::{Point, Rgba};

/// A value that can be tweened to as a whole group.
pub trait Keyframe: Copy {
    const GROUP: Group;

    fn apply(&self, tween: &mut TweenState, speed: f32);
}

impl Keyframe for Rgba {
    const GROUP: Group = Group::Color;

    fn apply(&self, tween: &mut TweenState, speed: f32) {
        tween.apply_color(*self, speed);
    }
}

impl Keyframe for Point {
    const GROUP: Group = Group::Location;

    fn apply(&self, tween: &mut TweenState, speed: f32) {
        tween.apply_location(self.x, self.y, speed);
    }
}

/// An absolute angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Heading(pub f32);

impl Keyframe for Heading {
    const GROUP: Group = Group::Angle;

    fn apply(&self, tween: &mut TweenState, speed: f32) {
        tween.apply_angle(self.0, speed);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyframeSequence<K> {
    frames: Vec<K>,
    speed: f32,
    looping: bool,
    index: usize,
}

impl<K: Keyframe> KeyframeSequence<K> {
    /// Visit every keyframe once, then rest on the last.
    pub fn sequence(frames: Vec<K>, speed: f32) -> Self {
        Self::new(frames, speed, false)
    }

    /// Visit the keyframes forever, wrapping back to the first.
    pub fn cycle(frames: Vec<K>, speed: f32) -> Self {
        Self::new(frames, speed, true)
    }

    fn new(frames: Vec<K>, speed: f32, looping: bool) -> Self {
        KeyframeSequence {
            frames,
            speed,
            looping,
            index: 0,
        }
    }

    pub fn start(&mut self, tween: &mut TweenState) {
        self.index = 0;
        if let Some(first) = self.frames.first() {
            first.apply(tween, self.speed);
        }
    }

    /// Advance the group's tween, then move on to the next keyframe once the
    /// current transition has finished.
    pub fn advance(&mut self, tween: &mut TweenState) {
        tween.advance_group(K::GROUP);

        if tween.is_group_changing(K::GROUP) || !self.is_active() {
            return;
        }

        self.index += 1;
        if self.looping && self.index >= self.frames.len() {
            self.index = 0;
        }
        if let Some(next) = self.frames.get(self.index) {
            next.apply(tween, self.speed);
        }
    }

    pub fn is_active(&self) -> bool {
        self.index < self.frames.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tween::Channel;

    fn at(tween: &TweenState) -> (f32, f32) {
        (tween.get(Channel::X), tween.get(Channel::Y))
    }

    #[test]
    fn start_on_unplaced_entity_jumps() {
        let mut tween = TweenState::new();
        let mut seq = KeyframeSequence::sequence(vec![Point::new(10.0, 20.0), Point::new(30.0, 20.0)], 10.0);
        seq.start(&mut tween);
        assert_eq!(at(&tween), (10.0, 20.0));
        assert_eq!(seq.index(), 0);
    }

    #[test]
    fn start_on_placed_entity_tweens() {
        let mut tween = TweenState::new();
        tween.apply_location(0.0, 0.0, 0.0);
        let mut seq = KeyframeSequence::sequence(vec![Point::new(10.0, 0.0)], 5.0);
        seq.start(&mut tween);
        assert_eq!(at(&tween), (0.0, 0.0));
        seq.advance(&mut tween);
        assert_eq!(at(&tween), (2.0, 0.0));
    }

    #[test]
    fn sequence_rests_on_last_keyframe() {
        let mut tween = TweenState::new();
        tween.apply_location(0.0, 0.0, 0.0);
        let mut seq = KeyframeSequence::sequence(vec![Point::new(4.0, 0.0), Point::new(4.0, 8.0)], 2.0);
        seq.start(&mut tween);
        for _ in 0..20 {
            seq.advance(&mut tween);
        }
        assert_eq!(at(&tween), (4.0, 8.0));
        assert!(!seq.is_active());
        assert_eq!(seq.index(), 2);

        for _ in 0..50 {
            seq.advance(&mut tween);
            assert_eq!(at(&tween), (4.0, 8.0));
        }
        assert_eq!(seq.index(), 2);
    }

    #[test]
    fn cycle_returns_to_first_keyframe_forever() {
        let mut tween = TweenState::new();
        let frames = vec![
            Rgba::new(255.0, 0.0, 0.0, 255.0),
            Rgba::new(0.0, 255.0, 0.0, 255.0),
            Rgba::new(0.0, 0.0, 255.0, 255.0),
        ];
        tween.apply_color(frames[2], 0.0);
        let mut seq = KeyframeSequence::cycle(frames.clone(), 5.0);
        seq.start(&mut tween);

        for lap in 0..4 {
            // Each leg takes 5 ticks of motion; the index moves on the tick
            // the leg completes.
            for leg in 0..3 {
                assert_eq!(seq.index(), leg, "lap {lap}");
                for _ in 0..5 {
                    seq.advance(&mut tween);
                }
                assert_eq!(tween.color(), frames[leg]);
            }
            assert_eq!(seq.index(), 0);
            assert!(seq.is_active());
        }
    }

    #[test]
    fn single_keyframe_cycle_is_harmless() {
        let mut tween = TweenState::new();
        let mut seq = KeyframeSequence::cycle(vec![Heading(90.0)], 3.0);
        seq.start(&mut tween);
        for _ in 0..10 {
            seq.advance(&mut tween);
            assert_eq!(tween.get(Channel::Angle), 90.0);
            assert_eq!(seq.index(), 0);
        }
    }

    #[test]
    fn empty_list_is_inert() {
        let mut tween = TweenState::new();
        tween.apply_location(1.0, 2.0, 0.0);
        let mut seq: KeyframeSequence<Point> = KeyframeSequence::cycle(Vec::new(), 3.0);
        seq.start(&mut tween);
        seq.advance(&mut tween);
        assert_eq!(at(&tween), (1.0, 2.0));
        assert!(!seq.is_active());
    }
}
