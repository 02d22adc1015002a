use std::{fs, path::Path, process};

use anyhow::{bail, Context, Result};
use log::{info, warn};

use teeny_arcade::{
    config::ArcadeConfig,
    games::GameKind,
    player::Player,
    types::{FrameContext, Grid, Outputs},
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "teeny-arcade play <adrift|vertices> [--seed N]";
const DUMP_USAGE: &str = "teeny-arcade dump <adrift|vertices> <ticks> [--seed N]";

fn run() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let seed = take_seed(&mut args)?;
    let mut args = args.into_iter();

    let command = args.next();
    let interactive = command.as_deref() == Some("play");
    let loaded = ArcadeConfig::try_load();
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(config.log_file.as_deref(), interactive)?;
    if let Err(e) = &loaded {
        warn!("{e:#}, using defaults");
    }
    if seed.is_some() {
        config.seed = seed;
    }

    match command.as_deref() {
        Some("play") => {
            let kind: GameKind = args.next().context(PLAY_USAGE)?.parse()?;
            play(kind, &config)
        }
        Some("dump") => {
            let kind: GameKind = args.next().context(DUMP_USAGE)?.parse()?;
            let ticks: u64 = args
                .next()
                .context(DUMP_USAGE)?
                .parse()
                .with_context(|| format!("Invalid tick count\n\nUsage: {DUMP_USAGE}"))?;
            dump(kind, ticks, &config)
        }
        _ => bail!("teeny-arcade: two tiny arcade games for the terminal\n\nUsage:\n  {PLAY_USAGE}\n  {DUMP_USAGE}"),
    }
}

/// Remove `--seed N` from the arguments, wherever it appears.
fn take_seed(args: &mut Vec<String>) -> Result<Option<u64>> {
    let Some(at) = args.iter().position(|a| a == "--seed") else {
        return Ok(None);
    };
    args.remove(at);
    if at >= args.len() {
        bail!("--seed needs a value");
    }
    let value = args.remove(at);
    let seed = value.parse().with_context(|| format!("Invalid seed {value:?}"))?;
    Ok(Some(seed))
}

/// The terminal player owns the screen, so it only logs to a file (or to
/// stderr when `RUST_LOG` asks for it). Headless runs log warnings to stderr.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default_filter = match (log_file, interactive) {
        (Some(_), _) => "info",
        (None, true) => "off",
        (None, false) => "warn",
    };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn play(kind: GameKind, config: &ArcadeConfig) -> Result<()> {
    let grid = Grid::default();
    let mut player = Player::new(kind.build(config, grid, config.seed), config, grid);
    player.play()
}

/// Run a game headless for `ticks` ticks, pressing start on the first, and
/// print the session's debug dump.
fn dump(kind: GameKind, ticks: u64, config: &ArcadeConfig) -> Result<()> {
    let grid = Grid::default();
    let mut game = kind.build(config, grid, config.seed);
    for tick in 0..ticks {
        let mut ctx = FrameContext::new(tick, grid);
        if tick == 0 {
            ctx = ctx.with_click(game.start_point());
        }
        game.tick(&ctx, &mut Outputs::default());
    }
    info!("{kind}: ran {ticks} ticks headless");

    let json = serde_json::to_string_pretty(&game.dump())?;
    println!("{json}");
    Ok(())
}
