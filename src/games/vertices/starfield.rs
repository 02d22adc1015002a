//! Stars streaming out from the centre of the screen.

use serde::Serialize;

use crate::engine::{RandomSource, Render};
use crate::types::{Grid, Outputs, Point, Rgba, SolidPrim};

pub const MAX_STARS: usize = 250;
const SPAWN_PER_TICK: u32 = 10;
const MAX_SPEED: f32 = 5.0;
const MAX_DELAY: f32 = 25.0;

#[derive(Debug, Clone, Serialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub age: u32,
    /// Ticks before the star becomes visible.
    pub show: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Top up, move every star, age it, and drop the ones that left `grid`.
    pub fn update(&mut self, grid: Grid, rng: &mut dyn RandomSource) {
        if self.stars.len() < MAX_STARS {
            for _ in 0..rng.below(SPAWN_PER_TICK) {
                let mut channel = || 100.0 + rng.scaled(155.0);
                let color = Rgba::new(channel(), channel(), channel(), 255.0);
                self.stars.push(Star {
                    x: grid.center_x(),
                    y: grid.center_y(),
                    dx: rng.spread(MAX_SPEED),
                    dy: rng.spread(MAX_SPEED),
                    age: 0,
                    show: rng.scaled(MAX_DELAY),
                    color,
                });
            }
        }

        for star in &mut self.stars {
            star.x += star.dx;
            star.y += star.dy;
            star.age += 1;
        }
        self.stars.retain(|s| grid.contains(Point::new(s.x, s.y)));
    }
}

impl Render for Starfield {
    fn render(&self, out: &mut Outputs) {
        for star in self.stars.iter().filter(|s| s.age as f32 > s.show) {
            out.solids.push(SolidPrim {
                x: star.x,
                y: star.y,
                w: 1.0,
                h: 1.0,
                color: star.color,
            });
        }
    }
}
