//! Vertices: click the shape with the fewest edges, as many times as you can
//! before the timer band fills the top of the screen.

mod counter;
mod polygon;
mod starfield;

pub use counter::Counter;
pub use polygon::{RegularPolygon, RosterEntry};
pub use starfield::Starfield;

use log::debug;
use serde_json::json;

use crate::config::VerticesConfig;
use crate::engine::{Entity, Outcome, PromptDrift, RandomSource, Render, Round, Rules, TitleScreen};
use crate::types::{Align, FrameContext, Grid, Outputs, Point, Rgba, SolidPrim};

const TITLE_MUSIC: &str = "vertices/sounds/title.ogg";
const PLAY_MUSIC: &str = "vertices/sounds/play.ogg";
const HIT_SOUND: &str = "vertices/sounds/hit.wav";
const MISS_SOUND: &str = "vertices/sounds/miss.wav";

const BASE_SHAPES: u64 = 3;
/// One more shape every three seconds.
const TICKS_PER_EXTRA_SHAPE: u64 = 180;
const TARGET_STEP: u32 = 2;
const TICKS_PER_SECOND: u64 = 60;

const TIMER_BAND: Rgba = Rgba::new(255.0, 10.0, 10.0, 255.0);

const PROMPT_CYCLE: [Rgba; 3] = [
    Rgba::new(255.0, 255.0, 255.0, 255.0),
    Rgba::new(100.0, 255.0, 100.0, 255.0),
    Rgba::new(255.0, 100.0, 255.0, 255.0),
];

const LOGO_CYCLE: [Rgba; 6] = [
    Rgba::new(255.0, 10.0, 0.0, 255.0),
    Rgba::new(205.0, 10.0, 50.0, 255.0),
    Rgba::new(50.0, 10.0, 205.0, 255.0),
    Rgba::new(0.0, 10.0, 255.0, 255.0),
    Rgba::new(50.0, 10.0, 205.0, 255.0),
    Rgba::new(205.0, 10.0, 50.0, 255.0),
];

#[derive(Debug, Clone)]
pub struct Vertices {
    play_ticks: u64,
    target_shapes: u32,
    shape_count: u32,
    polygons: Vec<RegularPolygon>,
    counter: Counter,
    stars: Starfield,
    next_id: u64,
}

impl Vertices {
    pub fn new(config: &VerticesConfig, grid: Grid) -> Self {
        Vertices {
            play_ticks: u64::from(config.play_seconds.max(1)) * TICKS_PER_SECOND,
            target_shapes: config.target_shapes,
            shape_count: 0,
            polygons: Vec::new(),
            counter: Counter::new(grid),
            stars: Starfield::new(),
            next_id: 0,
        }
    }

    pub fn target_shapes(&self) -> u32 {
        self.target_shapes
    }

    pub fn shape_count(&self) -> u32 {
        self.shape_count
    }

    pub fn polygons(&self) -> &[RegularPolygon] {
        &self.polygons
    }

    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    /// How many shapes should be live `elapsed` ticks into a round.
    pub fn wanted_shapes(elapsed: u64) -> usize {
        (BASE_SHAPES + elapsed / TICKS_PER_EXTRA_SHAPE) as usize
    }

    /// Fewest sides among the live shapes.
    pub fn min_sides(&self) -> Option<u32> {
        self.polygons.iter().map(RegularPolygon::sides).min()
    }

    fn fill_roster(&mut self, elapsed: u64, grid: Grid, rng: &mut dyn RandomSource) {
        while self.polygons.len() < Self::wanted_shapes(elapsed) {
            let sides = RegularPolygon::roll_sides(rng);
            let polygon = RegularPolygon::spawn(self.next_id, sides, grid, rng);
            debug!("spawned {} with {sides} sides", polygon.path());
            self.next_id += 1;
            self.polygons.push(polygon);
        }
    }

    /// Every shape under the click is judged: the ones with the fewest sides
    /// score and disappear, any other is a miss.
    fn handle_click(&mut self, click: Point, round: &mut Round<'_>) {
        let Some(min) = self.min_sides() else {
            return;
        };

        let mut cleared = Vec::new();
        for polygon in self.polygons.iter().filter(|p| p.contains(click)) {
            if polygon.sides() <= min {
                cleared.push(polygon.path().to_string());
                round.play_effect(HIT_SOUND);
            } else {
                debug!("miss on {} ({} sides, wanted {min})", polygon.path(), polygon.sides());
                round.play_effect(MISS_SOUND);
            }
        }
        if cleared.is_empty() {
            return;
        }

        self.polygons.retain(|p| !cleared.iter().any(|path| path == p.path()));
        self.shape_count += cleared.len() as u32;
        self.counter.set_count(self.shape_count, round.frame.grid);
        debug!("cleared {cleared:?}, score {}", self.shape_count);
    }

    fn finish(&mut self, elapsed: u64) -> Outcome {
        let success = self.shape_count >= self.target_shapes;
        let prompts = if success {
            self.target_shapes += TARGET_STEP;
            let secs_left = (self.play_ticks / TICKS_PER_SECOND).saturating_sub(elapsed / TICKS_PER_SECOND);
            vec![
                format!("You managed it with {secs_left} seconds left!"),
                format!("Can you get {} shapes now?", self.target_shapes),
            ]
        } else {
            vec![
                format!("You only managed {} shapes!", self.shape_count),
                "Can you do better?".to_string(),
            ]
        };

        self.polygons.clear();
        self.counter.hide();
        Outcome { success, prompts }
    }
}

fn prompt(text: String, at: Point) -> Entity {
    let mut label = Entity::label(text, 40.0, Align::Center);
    label.set_location(at.x, at.y, 0.0);
    label.color_cycle(PROMPT_CYCLE.to_vec(), 30.0);
    label
}

impl Rules for Vertices {
    fn name(&self) -> &'static str {
        "vertices"
    }

    fn background(&self) -> Rgba {
        Rgba::new(32.0, 0.0, 64.0, 255.0)
    }

    fn title_music(&self) -> &'static str {
        TITLE_MUSIC
    }

    fn play_music(&self) -> &'static str {
        PLAY_MUSIC
    }

    fn title_screen(&self, grid: Grid) -> TitleScreen {
        let (logo_w, logo_h) = (567.0, 135.0);
        let mut logo = Entity::sprite("vertices/sprites/logo.png", logo_w, logo_h);
        logo.color_cycle(LOGO_CYCLE.to_vec(), 15.0);
        let at = |inset: f32, y: f32| Point::new((grid.w - logo_w + inset) / 2.0, y);
        logo.location_cycle(
            vec![
                at(20.0, 480.0),
                at(0.0, 520.0),
                at(-20.0, 500.0),
                at(0.0, 480.0),
                at(20.0, 500.0),
                at(0.0, 520.0),
                at(-20.0, 480.0),
                at(0.0, 500.0),
            ],
            60.0,
        );

        let mut button = Entity::sprite("vertices/sprites/start.png", 256.0, 64.0);
        button.set_location(grid.center_x() - 128.0, 128.0, 0.0);
        button.color_cycle(vec![Rgba::WHITE, Rgba::new(128.0, 128.0, 128.0, 255.0)], 10.0);

        let anchor = Point::new(grid.center_x(), 400.0);
        TitleScreen {
            logo: Some(logo),
            button,
            prompts: vec![
                prompt("Click on the shape with the fewest edges".into(), anchor),
                prompt(
                    format!("Can you clear {} shapes in time?!", self.target_shapes),
                    Point::new(anchor.x, 325.0),
                ),
            ],
            drift: Some(PromptDrift {
                anchor,
                spread: Point::new(15.0, 5.0),
                spacing: 75.0,
                speed: 30.0,
            }),
        }
    }

    fn start(&mut self, _round: &mut Round<'_>) {
        self.shape_count = 0;
        self.polygons.clear();
        self.counter.hide();
    }

    fn update(&mut self, round: &mut Round<'_>) -> Option<Outcome> {
        if round.elapsed > self.play_ticks || self.shape_count >= self.target_shapes {
            return Some(self.finish(round.elapsed));
        }

        let grid = round.frame.grid;
        self.fill_roster(round.elapsed, grid, round.rng);
        self.counter.update();

        if let Some(click) = round.frame.click {
            self.handle_click(click, round);
        }

        for polygon in &mut self.polygons {
            polygon.update(grid, round.rng);
        }
        None
    }

    fn render(&self, ctx: &FrameContext, elapsed: u64, out: &mut Outputs) {
        let grid = ctx.grid;
        out.solids.push(SolidPrim {
            x: 0.0,
            y: grid.top() - 10.0,
            w: grid.w * elapsed as f32 / self.play_ticks as f32,
            h: 10.0,
            color: TIMER_BAND,
        });
        for polygon in &self.polygons {
            polygon.render(out);
        }
        self.counter.render(out);
    }

    fn update_backdrop(&mut self, ctx: &FrameContext, rng: &mut dyn RandomSource) {
        self.stars.update(ctx.grid, rng);
    }

    fn render_backdrop(&self, _ctx: &FrameContext, out: &mut Outputs) {
        self.stars.render(out);
    }

    fn dump(&self) -> serde_json::Value {
        json!({
            "play_ticks": self.play_ticks,
            "target_shapes": self.target_shapes,
            "shape_count": self.shape_count,
            "roster": self.polygons.iter().map(RegularPolygon::roster_entry).collect::<Vec<_>>(),
            "counter": { "count": self.counter.count(), "visible": self.counter.is_visible() },
            "stars": self.stars.len(),
        })
    }
}
