//! Tweened attribute set: per-entity linear interpolation of a fixed set of
//! numeric channels toward their targets.
//!
//! Every channel carries `(current, target, delta)`. Applying a value with a
//! nonzero speed stores `delta = (target - current) / speed`; each `advance`
//! adds the delta and snaps to the target once it is reached or passed, so a
//! tween never overshoots and always lands exactly on its target.

use serde::Serialize;

use crate::types::Rgba;

/// Fraction of one step below which a remaining gap counts as reached.
/// Absorbs float residue so `n` steps of `gap / n` land in exactly `n` ticks.
const SNAP_FRACTION: f32 = 1.0e-2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
    X,
    Y,
    Width,
    Height,
    Angle,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::Red,
        Channel::Green,
        Channel::Blue,
        Channel::Alpha,
        Channel::X,
        Channel::Y,
        Channel::Width,
        Channel::Height,
        Channel::Angle,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub const fn group(self) -> Group {
        match self {
            Channel::Red | Channel::Green | Channel::Blue | Channel::Alpha => Group::Color,
            Channel::X | Channel::Y => Group::Location,
            Channel::Width | Channel::Height => Group::Size,
            Channel::Angle => Group::Angle,
        }
    }
}

/// Channels that are always tweened together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Color,
    Location,
    Size,
    Angle,
}

impl Group {
    /// Update order used by `TweenState::advance` and entity updates.
    pub const ORDER: [Group; 4] = [Group::Color, Group::Location, Group::Size, Group::Angle];

    pub const fn channels(self) -> &'static [Channel] {
        match self {
            Group::Color => &[Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha],
            Group::Location => &[Channel::X, Channel::Y],
            Group::Size => &[Channel::Width, Channel::Height],
            Group::Angle => &[Channel::Angle],
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelState {
    pub current: f32,
    pub target: f32,
    pub delta: f32,
}

impl ChannelState {
    fn jump(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.delta = 0.0;
    }

    fn step(&mut self) {
        if self.delta == 0.0 {
            return;
        }
        let next = self.current + self.delta;
        let remaining = (self.target - next) * self.delta.signum();
        if remaining <= self.delta.abs() * SNAP_FRACTION {
            self.jump(self.target);
        } else {
            self.current = next;
        }
    }
}

/// Normalise an angular gap into `(-180, 180]`.
pub fn shortest_arc(gap: f32) -> f32 {
    let g = gap.rem_euclid(360.0);
    if g > 180.0 { g - 360.0 } else { g }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TweenState {
    channels: [ChannelState; 9],
    placed: [bool; 4],
    /// Eternal rotation in degrees per tick; independent of the angle tween.
    spin: f32,
    /// Requested heading in `[0, 360)` for the running angle tween.
    angle_goal: Option<f32>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> f32 {
        self.channels[channel.index()].current
    }

    pub fn target(&self, channel: Channel) -> f32 {
        self.channels[channel.index()].target
    }

    pub fn delta(&self, channel: Channel) -> f32 {
        self.channels[channel.index()].delta
    }

    pub fn set_target(&mut self, channel: Channel, value: f32) {
        if channel == Channel::Angle {
            self.angle_goal = None;
        }
        self.channels[channel.index()].target = value;
    }

    pub fn set_delta(&mut self, channel: Channel, value: f32) {
        if channel == Channel::Angle {
            self.angle_goal = None;
        }
        self.channels[channel.index()].delta = value;
    }

    /// Whether the group has ever been given a value.
    pub fn is_placed(&self, group: Group) -> bool {
        self.placed[group.index()]
    }

    /// Set every channel of `group` toward `values`.
    ///
    /// A zero speed, or a group that was never placed, jumps straight to the
    /// values; otherwise only targets and deltas change.
    pub fn apply(&mut self, group: Group, values: &[f32], speed: f32) {
        let channels = group.channels();
        debug_assert_eq!(channels.len(), values.len(), "wrong arity for {group:?}");
        debug_assert!(speed >= 0.0, "tween speed must not be negative");

        if group == Group::Angle {
            if let Some(&angle) = values.first() {
                self.apply_angle(angle, speed);
            }
            return;
        }

        let jump = speed == 0.0 || !self.is_placed(group);
        for (&channel, &value) in channels.iter().zip(values) {
            let state = &mut self.channels[channel.index()];
            if jump {
                state.jump(value);
            } else {
                state.target = value;
                state.delta = (value - state.current) / speed;
            }
        }
        self.placed[group.index()] = true;
    }

    pub fn apply_color(&mut self, color: Rgba, speed: f32) {
        self.apply(Group::Color, &[color.r, color.g, color.b, color.a], speed);
    }

    pub fn apply_location(&mut self, x: f32, y: f32, speed: f32) {
        self.apply(Group::Location, &[x, y], speed);
    }

    pub fn apply_size(&mut self, w: f32, h: f32, speed: f32) {
        self.apply(Group::Size, &[w, h], speed);
    }

    /// Turn toward `angle` through the shorter arc over `speed` ticks.
    /// Cancels any spin.
    pub fn apply_angle(&mut self, angle: f32, speed: f32) {
        self.spin = 0.0;
        let goal = angle.rem_euclid(360.0);
        let placed = self.is_placed(Group::Angle);
        let state = &mut self.channels[Channel::Angle.index()];
        if speed == 0.0 || !placed {
            state.jump(goal);
            self.angle_goal = None;
        } else {
            let gap = shortest_arc(goal - state.current);
            state.target = state.current + gap;
            state.delta = gap / speed;
            self.angle_goal = Some(goal);
        }
        self.placed[Group::Angle.index()] = true;
    }

    /// Rotate forever, one full turn every `period` ticks. A negative period
    /// turns clockwise; zero stops the spin.
    pub fn spin(&mut self, period: f32) {
        self.spin = if period == 0.0 { 0.0 } else { 360.0 / period };
        self.angle_goal = None;
        let state = &mut self.channels[Channel::Angle.index()];
        state.target = state.current;
        state.delta = 0.0;
        self.placed[Group::Angle.index()] = true;
    }

    pub fn spin_rate(&self) -> f32 {
        self.spin
    }

    pub fn is_spinning(&self) -> bool {
        self.spin != 0.0
    }

    /// Advance every group in update order.
    pub fn advance(&mut self) {
        for group in Group::ORDER {
            self.advance_group(group);
        }
    }

    pub fn advance_group(&mut self, group: Group) {
        for &channel in group.channels() {
            self.channels[channel.index()].step();
        }
        if group == Group::Angle {
            self.wrap_angle();
        }
    }

    fn wrap_angle(&mut self) {
        let spin = self.spin;
        let state = &mut self.channels[Channel::Angle.index()];
        // A finished turn lands on the requested heading, not its unwrapped twin.
        if state.delta == 0.0 {
            if let Some(goal) = self.angle_goal.take() {
                state.jump(goal);
                return;
            }
        }
        if spin != 0.0 {
            state.current += spin;
            state.target = state.current;
        }
        let turns = (state.current / 360.0).floor() * 360.0;
        if turns != 0.0 {
            state.current -= turns;
            state.target -= turns;
        }
    }

    pub fn is_changing(&self) -> bool {
        self.channels.iter().any(|c| c.delta != 0.0)
    }

    pub fn is_group_changing(&self, group: Group) -> bool {
        group
            .channels()
            .iter()
            .any(|&c| self.channels[c.index()].delta != 0.0)
    }

    pub fn color(&self) -> Rgba {
        Rgba::new(
            self.get(Channel::Red),
            self.get(Channel::Green),
            self.get(Channel::Blue),
            self.get(Channel::Alpha),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks_until_still(tween: &mut TweenState, limit: usize) -> usize {
        let mut n = 0;
        while tween.is_changing() && n < limit {
            tween.advance();
            n += 1;
        }
        n
    }

    #[test]
    fn zero_speed_jumps_without_delta() {
        let mut t = TweenState::new();
        t.apply_color(Rgba::new(10.0, 20.0, 30.0, 40.0), 0.0);
        assert_eq!(t.color(), Rgba::new(10.0, 20.0, 30.0, 40.0));
        assert!(!t.is_changing());
    }

    #[test]
    fn unplaced_group_jumps_even_with_speed() {
        let mut t = TweenState::new();
        t.apply_location(100.0, 50.0, 30.0);
        assert_eq!(t.get(Channel::X), 100.0);
        assert_eq!(t.get(Channel::Y), 50.0);
        assert!(!t.is_group_changing(Group::Location));
    }

    #[test]
    fn speed_sets_delta_and_leaves_current() {
        let mut t = TweenState::new();
        t.apply_location(0.0, 0.0, 0.0);
        t.apply_location(100.0, -40.0, 4.0);
        assert_eq!(t.get(Channel::X), 0.0);
        assert_eq!(t.delta(Channel::X), 25.0);
        assert_eq!(t.delta(Channel::Y), -10.0);
        assert!(t.is_changing());
    }

    #[test]
    fn converges_exactly_within_bound() {
        let cases: [(f32, f32, f32); 6] = [
            (0.0, 1.0, 3.0),
            (255.0, 0.0, 60.0),
            (17.5, 900.25, 7.0),
            (-3.0, 3.0, 10.0),
            (100.0, 90.0, 30.0),
            (0.0, 640.0, 97.0),
        ];
        for (from, to, speed) in cases {
            let mut t = TweenState::new();
            t.apply_size(from, from, 0.0);
            t.apply_size(to, from, speed);
            let delta = t.delta(Channel::Width);
            let bound = ((to - from).abs() / delta.abs()).ceil() as usize;
            let mut prev = from;
            for _ in 0..bound {
                t.advance();
                let now = t.get(Channel::Width);
                // Never overshoot in the direction of travel.
                assert!((now - prev) * delta.signum() >= 0.0);
                assert!((to - now) * delta.signum() >= 0.0, "overshot {from}->{to}");
                prev = now;
            }
            assert_eq!(t.get(Channel::Width), to, "{from}->{to} at speed {speed}");
            assert_eq!(t.delta(Channel::Width), 0.0);
            assert!(!t.is_changing());
        }
    }

    #[test]
    fn large_delta_snaps_without_oscillating() {
        let mut t = TweenState::new();
        t.apply_size(0.0, 0.0, 0.0);
        t.set_target(Channel::Width, 10.0);
        t.set_delta(Channel::Width, 50.0);
        t.advance();
        assert_eq!(t.get(Channel::Width), 10.0);
        t.advance();
        assert_eq!(t.get(Channel::Width), 10.0);
        assert!(!t.is_changing());
    }

    #[test]
    fn angle_takes_the_shorter_arc() {
        let mut t = TweenState::new();
        t.apply_angle(350.0, 0.0);
        t.apply_angle(10.0, 1.0);
        assert_eq!(t.delta(Channel::Angle), 20.0);
        t.advance();
        assert_eq!(t.get(Channel::Angle), 10.0);
        assert!(!t.is_changing());

        let mut t = TweenState::new();
        t.apply_angle(350.0, 0.0);
        t.apply_angle(10.0, 4.0);
        let mut seen = Vec::new();
        while t.is_changing() {
            t.advance();
            seen.push(t.get(Channel::Angle));
        }
        assert_eq!(seen, vec![355.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn angle_lands_exactly_across_the_wrap() {
        let mut t = TweenState::new();
        t.apply_angle(359.7, 0.0);
        t.apply_angle(0.3, 3.0);
        assert_eq!(ticks_until_still(&mut t, 10), 3);
        assert_eq!(t.get(Channel::Angle), 0.3);
        assert_eq!(t.target(Channel::Angle), 0.3);

        let mut t = TweenState::new();
        t.apply_angle(0.3, 0.0);
        t.apply_angle(359.7, 2.0);
        assert_eq!(ticks_until_still(&mut t, 10), 2);
        assert_eq!(t.get(Channel::Angle), 359.7);
    }

    #[test]
    fn angle_turns_anticlockwise_when_shorter() {
        let mut t = TweenState::new();
        t.apply_angle(10.0, 0.0);
        t.apply_angle(300.0, 7.0);
        assert!(t.delta(Channel::Angle) < 0.0);
        assert_eq!(ticks_until_still(&mut t, 100), 7);
        assert_eq!(t.get(Channel::Angle), 300.0);
    }

    #[test]
    fn spin_wraps_and_is_not_a_change() {
        let mut t = TweenState::new();
        t.apply_angle(0.0, 0.0);
        t.spin(-4.0);
        assert!(!t.is_changing());
        t.advance();
        assert_eq!(t.get(Channel::Angle), 270.0);
        t.advance();
        assert_eq!(t.get(Channel::Angle), 180.0);
        t.apply_angle(90.0, 0.0);
        assert!(!t.is_spinning());
    }

    #[test]
    fn shortest_arc_range() {
        assert_eq!(shortest_arc(-340.0), 20.0);
        assert_eq!(shortest_arc(340.0), -20.0);
        assert_eq!(shortest_arc(180.0), 180.0);
        assert_eq!(shortest_arc(-180.0), 180.0);
        assert_eq!(shortest_arc(0.0), 0.0);
    }
}
