//! Score splash shown each time a shape is cleared.

use crate::engine::entity::Entity;
use crate::engine::Render;
use crate::types::{Align, Grid, LabelPrim, Outputs, Rgba};

const START_SIZE: f32 = 128.0;
const END_SIZE: f32 = 768.0;
const SPLASH_TICKS: f32 = 60.0;

#[derive(Debug, Clone)]
pub struct Counter {
    count: u32,
    entity: Entity,
}

impl Counter {
    /// Starts hidden, centred on the grid.
    pub fn new(grid: Grid) -> Self {
        let mut entity = Entity::label("0", START_SIZE, Align::Left);
        entity.set_size(START_SIZE, START_SIZE, 0.0);
        entity.set_color(Rgba::new(255.0, 0.0, 0.0, 0.0), 0.0);
        entity.set_location(grid.center_x() - START_SIZE / 2.0, (grid.h - START_SIZE) / 2.0, 0.0);
        Counter { count: 0, entity }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Show `count` and restart the splash: jump below centre, then drift up
    /// and left while growing and fading from red to nothing.
    pub fn set_count(&mut self, count: u32, grid: Grid) {
        self.count = count;
        self.entity.set_text(count.to_string());

        let (cx, cy) = (grid.center_x(), grid.center_y());
        self.entity.set_location(cx, cy - 250.0, 0.0);
        self.entity.set_location(cx - 175.0, cy + 250.0, SPLASH_TICKS);
        self.entity.set_size(START_SIZE, START_SIZE, 0.0);
        self.entity.set_size(END_SIZE, END_SIZE, SPLASH_TICKS);
        self.entity.set_color(Rgba::new(255.0, 0.0, 0.0, 255.0), 0.0);
        self.entity.set_color(Rgba::new(0.0, 0.0, 0.0, 0.0), SPLASH_TICKS);
    }

    pub fn hide(&mut self) {
        let mut color = self.entity.color();
        color.a = 0.0;
        self.entity.set_color(color, 0.0);
    }

    pub fn is_visible(&self) -> bool {
        self.entity.is_visible()
    }

    pub fn update(&mut self) {
        self.entity.update();
    }
}

impl Render for Counter {
    /// Drawn like a sprite: the text fills the entity's box from its top edge.
    fn render(&self, out: &mut Outputs) {
        if !self.is_visible() {
            return;
        }
        let e = &self.entity;
        out.labels.push(LabelPrim {
            x: e.x(),
            y: e.y() + e.h(),
            text: self.count.to_string(),
            size: e.h(),
            align: Align::Left,
            tint: e.color(),
        });
    }
}
