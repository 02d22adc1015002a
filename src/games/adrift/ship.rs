//! The player's ship: turns toward a target heading at a fixed rate and
//! drifts on whatever velocity its engine bursts have given it.

use serde::Serialize;

use crate::engine::{Entity, Render};
use crate::engine::tween::shortest_arc;
use crate::types::{LinePrim, Outputs, Point, Rgba, SpritePrim};

/// Ticks one engine burst lasts.
pub const THRUST_DURATION: u32 = 50;
/// Degrees per tick.
pub const TURN_SPEED: f32 = 4.0;
pub const SIZE: f32 = 64.0;
/// Each manual burst aims 35% past the fastest speed seen so far.
const PEAK_GROWTH: f32 = 1.35;
/// Force used when there is no peak to grow from yet.
const BASE_FORCE: f32 = 2.0;
const SPRITE: &str = "adrift/sprites/player-ship.png";
const JET: Rgba = Rgba::new(255.0, 160.0, 40.0, 255.0);

#[derive(Debug, Clone)]
pub struct Ship {
    entity: Entity,
    target_angle: f32,
    velocity: Point,
    peak: f32,
    /// Target speed of the current burst.
    burst: f32,
    increment: f32,
    countdown: u32,
    fired: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipDump {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub target_angle: f32,
    pub velocity: Point,
    pub speed: f32,
    pub peak: f32,
    pub burst: f32,
    pub countdown: u32,
    pub fired: bool,
}

impl Ship {
    /// A motionless ship centred on `at`.
    pub fn new(at: Point) -> Self {
        let mut entity = Entity::sprite(SPRITE, SIZE, SIZE);
        entity.set_location(at.x - SIZE / 2.0, at.y - SIZE / 2.0, 0.0);
        entity.set_angle(0.0, 0.0);
        Ship {
            entity,
            target_angle: 0.0,
            velocity: Point::default(),
            peak: 0.0,
            burst: 0.0,
            increment: 0.0,
            countdown: 0,
            fired: false,
        }
    }

    pub fn center(&self) -> Point {
        self.entity.center()
    }

    pub fn angle(&self) -> f32 {
        self.entity.angle()
    }

    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.x.hypot(self.velocity.y)
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    pub fn is_thrusting(&self) -> bool {
        self.countdown > 0
    }

    /// True only on the tick a burst started.
    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Recentre, face `heading`, and stop dead.
    pub fn reset(&mut self, at: Point, heading: f32) {
        *self = Ship::new(at);
        self.entity.set_angle(heading, 0.0);
        self.target_angle = self.angle();
    }

    /// Set the heading to turn toward; the turn itself happens in `update`.
    pub fn aim(&mut self, angle: f32) {
        self.target_angle = angle.rem_euclid(360.0);
    }

    /// Aim at a point in world space.
    pub fn aim_at(&mut self, p: Point) {
        let c = self.center();
        if p != c {
            self.aim((p.y - c.y).atan2(p.x - c.x).to_degrees());
        }
    }

    /// Start an engine burst. With no force, aim for 1.35× the peak speed.
    pub fn thrust(&mut self, force: Option<f32>) {
        let burst = match force {
            Some(force) => force,
            None if self.peak > 0.0 => self.peak * PEAK_GROWTH,
            None => BASE_FORCE,
        };
        self.fire(burst);
    }

    fn fire(&mut self, burst: f32) {
        self.burst = burst;
        self.increment = burst / THRUST_DURATION as f32;
        self.countdown = THRUST_DURATION;
        self.fired = true;
    }

    pub fn update(&mut self) {
        self.turn();

        if self.countdown > 0 {
            let heading = self.angle().to_radians();
            self.velocity.x += self.increment * heading.cos();
            self.velocity.y += self.increment * heading.sin();
            self.countdown -= 1;

            // Holding thrust: keep pushing until the burst's speed is reached.
            if self.countdown == 0 && self.speed() < self.burst {
                self.fire(self.burst);
            }
        }

        self.peak = self.peak.max(self.speed());
        let (x, y) = (self.entity.x() + self.velocity.x, self.entity.y() + self.velocity.y);
        self.entity.set_location(x, y, 0.0);
    }

    fn turn(&mut self) {
        let gap = shortest_arc(self.target_angle - self.angle());
        if gap == 0.0 {
            return;
        }
        let step = gap.clamp(-TURN_SPEED, TURN_SPEED);
        self.entity.set_angle((self.angle() + step).rem_euclid(360.0), 0.0);
    }

    /// Clear the per-tick flags once the frame has been drawn.
    pub fn end_frame(&mut self) {
        self.fired = false;
    }

    pub fn dump(&self) -> ShipDump {
        let c = self.center();
        ShipDump {
            x: c.x,
            y: c.y,
            angle: self.angle(),
            target_angle: self.target_angle,
            velocity: self.velocity,
            speed: self.speed(),
            peak: self.peak,
            burst: self.burst,
            countdown: self.countdown,
            fired: self.fired,
        }
    }
}

impl Render for Ship {
    fn render(&self, out: &mut Outputs) {
        let e = &self.entity;
        if self.is_thrusting() {
            let c = self.center();
            let back = (self.angle() + 180.0).to_radians();
            let len = SIZE * 0.75;
            out.lines.push(LinePrim {
                x: c.x + back.cos() * SIZE / 2.0,
                y: c.y + back.sin() * SIZE / 2.0,
                x2: c.x + back.cos() * len,
                y2: c.y + back.sin() * len,
                color: JET,
            });
        }
        out.sprites.push(SpritePrim {
            x: e.x(),
            y: e.y(),
            w: e.w(),
            h: e.h(),
            path: SPRITE.to_string(),
            angle: e.angle(),
            tint: e.color(),
        });
    }
}
