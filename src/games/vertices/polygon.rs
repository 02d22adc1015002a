//! The shapes the player hunts for.

use serde::Serialize;

use crate::engine::entity::Entity;
use crate::engine::{RandomSource, Render};
use crate::types::{Grid, Outputs, Point, Rgba};

pub const RADIUS: f32 = 64.0;
pub const MIN_SIDES: u32 = 3;
pub const MAX_SIDES: u32 = 9;

/// Keeps wandering shapes clear of the timer band.
const TOP_MARGIN: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct RegularPolygon {
    sides: u32,
    path: String,
    entity: Entity,
}

/// Roster entry as it appears in debug dumps.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub sides: u32,
    pub path: String,
    pub x: f32,
    pub y: f32,
}

impl RegularPolygon {
    /// A freshly spawned shape: random colour, random spot, random spin.
    pub fn spawn(id: u64, sides: u32, grid: Grid, rng: &mut dyn RandomSource) -> Self {
        let mut entity = Entity::polygon(sides, RADIUS);
        let color = Rgba::new(55.0 + rng.scaled(200.0), 155.0 + rng.scaled(100.0), 55.0 + rng.scaled(200.0), 255.0);
        entity.set_color(color, 0.0);

        let (w, h) = (RADIUS * 2.0, RADIUS * 2.0);
        let x = rng.scaled(grid.w - w);
        let y = rng.scaled(grid.h - h - TOP_MARGIN);
        entity.set_location(x, y, 0.0);

        let period = 30.0 + rng.scaled(60.0);
        entity.spin(rng.with_sign(period));

        RegularPolygon {
            sides,
            path: format!("polygon{id}"),
            entity,
        }
    }

    /// A shape at a fixed spot with no motion.
    pub fn placed(id: u64, sides: u32, at: Point) -> Self {
        let mut entity = Entity::polygon(sides, RADIUS);
        entity.set_location(at.x, at.y, 0.0);
        RegularPolygon {
            sides,
            path: format!("polygon{id}"),
            entity,
        }
    }

    /// Random side count in `MIN_SIDES..=MAX_SIDES`.
    pub fn roll_sides(rng: &mut dyn RandomSource) -> u32 {
        MIN_SIDES + rng.below(MAX_SIDES - MIN_SIDES + 1)
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn contains(&self, p: Point) -> bool {
        self.entity.hit_test(p)
    }

    /// Advance the tweens; once the shape comes to rest it heads for a random
    /// point on a random screen edge with a fresh spin.
    pub fn update(&mut self, grid: Grid, rng: &mut dyn RandomSource) {
        self.entity.update();
        if self.entity.is_moving() {
            return;
        }

        let speed = 60.0 + rng.scaled(40.0);
        let max_x = grid.w - self.entity.w();
        let max_y = grid.h - self.entity.h() - TOP_MARGIN;
        let (x, y) = match rng.below(4) {
            0 => (0.0, rng.scaled(max_y)),
            1 => (rng.scaled(max_x), 0.0),
            2 => (max_x, rng.scaled(max_y)),
            _ => (rng.scaled(max_x), max_y),
        };
        self.entity.set_location(x, y, speed);

        let period = 50.0 + rng.scaled(30.0);
        self.entity.spin(rng.with_sign(period));
    }

    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            sides: self.sides,
            path: self.path.clone(),
            x: self.entity.x(),
            y: self.entity.y(),
        }
    }
}

impl Render for RegularPolygon {
    fn render(&self, out: &mut Outputs) {
        self.entity.render(out);
    }
}
