use serde_json::Value;

use teeny_arcade::{
    config::ArcadeConfig,
    engine::{Game, Phase, ScriptedRandom},
    games::GameKind,
    types::{FrameContext, Grid, Outputs, Point, SoundRequest},
};

fn start(game: &mut dyn Game, grid: Grid) -> Outputs {
    let mut out = Outputs::default();
    game.tick(&FrameContext::new(0, grid).with_click(game.start_point()), &mut out);
    assert_eq!(game.phase(), Phase::Active);
    out
}

/// Centre of the live shape with the fewest sides, from a session dump.
fn easiest_shape(dump: &Value) -> Option<Point> {
    dump["rules"]["roster"]
        .as_array()?
        .iter()
        .min_by_key(|entry| entry["sides"].as_u64())
        .map(|entry| {
            let x = entry["x"].as_f64().unwrap_or_default() as f32;
            let y = entry["y"].as_f64().unwrap_or_default() as f32;
            Point::new(x + 64.0, y + 64.0)
        })
}

#[test]
fn seeded_runs_are_reproducible() {
    let config = ArcadeConfig::default();
    let grid = Grid::default();
    for kind in GameKind::ALL {
        let run = || {
            let mut game = kind.build(&config, grid, Some(42));
            start(game.as_mut(), grid);
            for tick in 1..300 {
                let mouse = Point::new((tick * 7 % 1280) as f32, 200.0);
                game.tick(&FrameContext::new(tick, grid).with_mouse(mouse), &mut Outputs::default());
            }
            game.dump()
        };
        assert_eq!(run(), run(), "{kind} diverged under the same seed");
    }
}

#[test]
fn clicking_the_fewest_sided_shapes_wins_vertices() {
    let config = ArcadeConfig::default();
    let grid = Grid::default();
    let mut game = GameKind::Vertices.build(&config, grid, Some(7));
    start(game.as_mut(), grid);

    let mut hits = 0;
    let mut tick = 1;
    while game.phase() == Phase::Active && tick < 1200 {
        let mut ctx = FrameContext::new(tick, grid);
        if let Some(target) = easiest_shape(&game.dump()) {
            ctx = ctx.with_click(target);
        }
        let mut out = Outputs::default();
        game.tick(&ctx, &mut out);
        hits += out.sounds.iter().filter(|s| **s == SoundRequest::Once("vertices/sounds/hit.wav".into())).count();
        tick += 1;
    }

    let dump = game.dump();
    assert_eq!(game.phase(), Phase::Title);
    assert!(hits >= 10);
    assert!(dump["prompts"][0].as_str().unwrap().starts_with("You managed it with"));
    assert_eq!(dump["prompts"][1], "Can you get 12 shapes now?");
    assert_eq!(dump["rules"]["roster"].as_array().map(Vec::len), Some(0));
}

#[test]
fn idle_vertices_round_times_out() {
    let mut config = ArcadeConfig::default();
    config.vertices.play_seconds = 2;
    let grid = Grid::default();
    let mut game = GameKind::Vertices.build(&config, grid, Some(3));
    start(game.as_mut(), grid);
    for tick in 1..=121 {
        game.tick(&FrameContext::new(tick, grid), &mut Outputs::default());
    }
    assert_eq!(game.phase(), Phase::Title);
    assert_eq!(game.dump()["prompts"][0], "You only managed 0 shapes!");
}

#[test]
fn adrift_ship_that_is_never_steered_drifts_away() {
    let config = ArcadeConfig::default();
    let grid = Grid::default();
    // Heading 0: straight for the right edge.
    let mut game = GameKind::Adrift.build_with(&config, grid, Box::new(ScriptedRandom::constant(0.0)));
    let out = start(game.as_mut(), grid);
    assert!(out.sounds.contains(&SoundRequest::Looping("adrift/sounds/ObservingTheStar.ogg".into())));

    let ahead = Point::new(10_000.0, 360.0);
    let mut tick = 1;
    while game.phase() == Phase::Active && tick < 1200 {
        game.tick(&FrameContext::new(tick, grid).with_mouse(ahead), &mut Outputs::default());
        tick += 1;
    }
    assert_eq!(game.phase(), Phase::Title);
    let dump = game.dump();
    assert!(dump["prompts"][0].as_str().unwrap().starts_with("You drifted away after"));
    assert!(dump["rules"]["ship"]["x"].as_f64().unwrap() > 1280.0);
}

#[test]
fn music_toggle_stops_and_restarts_the_track() {
    let config = ArcadeConfig::default();
    let grid = Grid::default();
    let mut game = GameKind::Vertices.build(&config, grid, Some(1));
    let title = SoundRequest::Looping("vertices/sounds/title.ogg".into());

    let mut out = Outputs::default();
    game.tick(&FrameContext::new(0, grid), &mut out);
    assert_eq!(out.sounds, vec![title.clone()]);

    let mut out = Outputs::default();
    game.toggle_music(&mut out);
    assert_eq!(out.sounds, vec![SoundRequest::Stop]);
    assert!(!game.audio().music());

    let mut out = Outputs::default();
    game.tick(&FrameContext::new(1, grid), &mut out);
    assert!(out.sounds.is_empty());

    let mut out = Outputs::default();
    game.toggle_music(&mut out);
    game.tick(&FrameContext::new(2, grid), &mut out);
    assert!(game.audio().music());
    assert!(out.sounds.contains(&title));
}

#[test]
fn unknown_game_names_are_rejected() {
    assert_eq!("Adrift".parse::<GameKind>().unwrap(), GameKind::Adrift);
    assert!("pong".parse::<GameKind>().is_err());
}
