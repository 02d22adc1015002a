//! Adrift: keep a drifting ship on screen by pointing it with the mouse and
//! firing its engines.

mod ship;

pub use ship::{Ship, ShipDump, THRUST_DURATION, TURN_SPEED};

use log::debug;
use serde_json::json;

use crate::config::AdriftConfig;
use crate::engine::{Entity, Outcome, Render, Round, Rules, TitleScreen};
use crate::types::{Align, FrameContext, Grid, LabelPrim, Outputs, Point, Rgba, SpritePrim};

const MUSIC: &str = "adrift/sounds/ObservingTheStar.ogg";
const THRUST_SOUND: &str = "adrift/sounds/thrust.wav";
const NEBULA: &str = "adrift/sprites/orion-nebula.png";

/// Force of the burst that sets a fresh ship drifting.
const DRIFT_FORCE: f32 = 2.0;
const TICKS_PER_SECOND: u64 = 60;

const PROMPT_CYCLE: [Rgba; 3] = [
    Rgba::new(255.0, 255.0, 255.0, 255.0),
    Rgba::new(100.0, 255.0, 100.0, 255.0),
    Rgba::new(255.0, 100.0, 255.0, 255.0),
];

#[derive(Debug, Clone)]
pub struct Adrift {
    play_ticks: u64,
    ship: Ship,
}

/// `SS.hh` for a tick count at 60 ticks per second.
pub fn timer_text(elapsed: u64) -> String {
    let seconds = elapsed / TICKS_PER_SECOND;
    let hundreds = (elapsed % TICKS_PER_SECOND) * 100 / TICKS_PER_SECOND;
    format!("{seconds:02}.{hundreds:02}")
}

impl Adrift {
    pub fn new(config: &AdriftConfig, grid: Grid) -> Self {
        Adrift {
            play_ticks: u64::from(config.play_seconds.max(1)) * TICKS_PER_SECOND,
            ship: Ship::new(Point::new(grid.center_x(), grid.center_y())),
        }
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn play_seconds(&self) -> u64 {
        self.play_ticks / TICKS_PER_SECOND
    }
}

fn prompt(text: String, y: f32, size: f32, grid: Grid) -> Entity {
    let mut label = Entity::label(text, size, Align::Center);
    label.set_location(grid.center_x(), y, 0.0);
    label.color_cycle(PROMPT_CYCLE.to_vec(), 30.0);
    label
}

impl Rules for Adrift {
    fn name(&self) -> &'static str {
        "adrift"
    }

    fn background(&self) -> Rgba {
        Rgba::new(16.0, 0.0, 32.0, 255.0)
    }

    fn title_music(&self) -> &'static str {
        MUSIC
    }

    fn play_music(&self) -> &'static str {
        MUSIC
    }

    fn title_screen(&self, grid: Grid) -> TitleScreen {
        let mut button = Entity::sprite("adrift/sprites/start.png", 256.0, 64.0);
        button.set_location(grid.center_x() - 128.0, 350.0, 0.0);
        button.color_cycle(vec![Rgba::WHITE, Rgba::new(128.0, 128.0, 128.0, 255.0)], 10.0);

        TitleScreen {
            logo: None,
            button,
            prompts: vec![
                prompt("Move your mouse to rotate your ship.".into(), 600.0, 34.0, grid),
                prompt("Click to fire your engines.".into(), 550.0, 34.0, grid),
                prompt(
                    format!("Can you stay on the screen for {} seconds?!", self.play_seconds()),
                    225.0,
                    26.0,
                    grid,
                ),
            ],
            drift: None,
        }
    }

    /// Recentre the ship and set it drifting in a random direction at a
    /// fixed, gentle speed.
    fn start(&mut self, round: &mut Round<'_>) {
        let grid = round.frame.grid;
        let heading = round.rng.scaled(360.0).floor();
        self.ship.reset(Point::new(grid.center_x(), grid.center_y()), heading);
        self.ship.thrust(Some(DRIFT_FORCE));
        if self.ship.fired() {
            round.play_effect(THRUST_SOUND);
        }
        debug!("ship reset heading {heading}");
    }

    fn update(&mut self, round: &mut Round<'_>) -> Option<Outcome> {
        let ctx = round.frame;
        if round.elapsed > self.play_ticks {
            return Some(Outcome {
                success: true,
                prompts: vec![
                    format!("You stayed adrift for {} seconds!", self.play_seconds()),
                    "Can you do it again?".to_string(),
                ],
            });
        }

        self.ship.aim_at(ctx.mouse);
        if ctx.click.is_some() {
            self.ship.thrust(None);
        }
        self.ship.update();
        if self.ship.fired() {
            round.play_effect(THRUST_SOUND);
        }

        if !ctx.grid.contains(self.ship.center()) {
            return Some(Outcome {
                success: false,
                prompts: vec![
                    format!("You drifted away after {} seconds!", timer_text(round.elapsed)),
                    "Can you do better?".to_string(),
                ],
            });
        }
        None
    }

    fn render(&self, ctx: &FrameContext, elapsed: u64, out: &mut Outputs) {
        self.ship.render(out);
        out.labels.push(LabelPrim {
            x: ctx.grid.center_x(),
            y: ctx.grid.top() - 20.0,
            text: timer_text(elapsed),
            size: 64.0,
            align: Align::Center,
            tint: Rgba::WHITE,
        });
    }

    fn render_backdrop(&self, ctx: &FrameContext, out: &mut Outputs) {
        out.sprites.push(SpritePrim {
            x: 0.0,
            y: 0.0,
            w: ctx.grid.w,
            h: ctx.grid.h,
            path: NEBULA.to_string(),
            angle: 0.0,
            tint: Rgba::new(255.0, 255.0, 255.0, 64.0),
        });
    }

    fn end_frame(&mut self) {
        self.ship.end_frame();
    }

    fn dump(&self) -> serde_json::Value {
        json!({
            "play_ticks": self.play_ticks,
            "ship": self.ship.dump(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AudioController, Game, Phase, ScriptedRandom, Session};
    use crate::types::SoundRequest;

    fn started(play_seconds: u32, heading_ratio: f32) -> (Session<Adrift>, Outputs) {
        let grid = Grid::default();
        let mut s = Session::new(
            Adrift::new(&AdriftConfig { play_seconds }, grid),
            grid,
            AudioController::default(),
            Box::new(ScriptedRandom::constant(heading_ratio)),
        );
        let mut out = Outputs::default();
        let ctx = FrameContext::new(0, grid).with_click(s.start_point());
        s.tick(&ctx, &mut out);
        assert_eq!(s.phase(), Phase::Active);
        (s, out)
    }

    #[test]
    fn timer_reads_seconds_and_hundredths() {
        assert_eq!(timer_text(0), "00.00");
        assert_eq!(timer_text(59), "00.98");
        assert_eq!(timer_text(90), "01.50");
        assert_eq!(timer_text(1200), "20.00");
    }

    #[test]
    fn start_recentres_and_drifts() {
        let (s, out) = started(20, 0.25);
        assert!(out.sounds.contains(&SoundRequest::Once(THRUST_SOUND.into())));
        // One track for both phases: it keeps playing through the start.
        assert!(!out.sounds.contains(&SoundRequest::Stop));
        let ship = s.rules().ship();
        assert_eq!(ship.angle(), 90.0);
        assert_eq!(ship.center(), Point::new(640.0, 360.0));
        assert_eq!(ship.dump().burst, DRIFT_FORCE);
        // The drift burst's flag is cleared with the frame.
        assert!(!ship.fired());
    }

    #[test]
    fn clicks_fire_the_engines_with_a_sound() {
        let (mut s, _) = started(20, 0.0);
        let grid = Grid::default();
        for tick in 1..60 {
            s.tick(&FrameContext::new(tick, grid).with_mouse(Point::new(1000.0, 360.0)), &mut Outputs::default());
        }
        let mut out = Outputs::default();
        s.tick(&FrameContext::new(60, grid).with_click(Point::new(1000.0, 360.0)), &mut out);
        assert!(out.sounds.contains(&SoundRequest::Once(THRUST_SOUND.into())));
        assert!(s.rules().ship().is_thrusting());
    }

    #[test]
    fn surviving_the_budget_is_a_success() {
        let (mut s, _) = started(1, 0.0);
        let grid = Grid::default();
        // Keep the mouse dead ahead so the ship never turns.
        for tick in 1..=60 {
            s.tick(&FrameContext::new(tick, grid).with_mouse(Point::new(1280.0, 360.0)), &mut Outputs::default());
            assert_eq!(s.phase(), Phase::Active);
        }
        let mut out = Outputs::default();
        s.tick(&FrameContext::new(61, grid), &mut out);
        assert_eq!(s.phase(), Phase::Title);
        assert!(out.sounds.is_empty());
        assert!(s.audio().is_playing());
        assert_eq!(s.title().prompt_texts()[0], "You stayed adrift for 1 seconds!");
    }

    #[test]
    fn leaving_the_screen_is_a_failure() {
        let (mut s, _) = started(600, 0.0);
        let grid = Grid::default();
        let far = Point::new(10_000.0, 360.0);
        let mut tick = 0;
        while s.phase() == Phase::Active && tick < 5000 {
            tick += 1;
            let ctx = if tick % 50 == 0 {
                FrameContext::new(tick, grid).with_click(far)
            } else {
                FrameContext::new(tick, grid).with_mouse(far)
            };
            s.tick(&ctx, &mut Outputs::default());
        }
        assert_eq!(s.phase(), Phase::Title);
        assert!(s.title().prompt_texts()[0].starts_with("You drifted away after"));
    }
}
