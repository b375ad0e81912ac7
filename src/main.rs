//! Headless runner (default binary).
//!
//! Drives a game with a fixed tick loop and a scripted planner, then prints the final
//! snapshot as JSON. Useful for replaying token scripts against a seed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::prelude::*;

use srs_tetris::core::{EngineConfig, GameState};
use srs_tetris::engine::{parse_sequence, AutoPlayer, ScriptedPlanner};
use srs_tetris::types::TICK_MS;

/// Upper bound on simulated time so a script that never drops still terminates.
const MAX_TICKS: u64 = 10_000_000;

#[derive(Debug, Parser)]
#[command(name = "srs-tetris", about = "Replay an action-token script against a seeded game")]
struct Cli {
    #[arg(long, help = "Path to a JSON engine configuration")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1, help = "Bag randomizer seed")]
    seed: u32,

    #[arg(
        long,
        default_value = "hard_drop",
        help = "Comma-separated tokens replayed for every piece"
    )]
    script: String,

    #[arg(long, default_value_t = 100, help = "Stop after this many pieces have locked")]
    pieces: u32,

    #[arg(long, default_value = "info", help = "Log level (error, warn, info, debug, trace)")]
    log_level: Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(cli.log_level))
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let script = parse_sequence(&cli.script).context("parsing --script")?;
    if script.is_empty() {
        anyhow::bail!("--script must contain at least one token");
    }

    let mut game = GameState::new(config, cli.seed);
    game.start();
    info!(seed = cli.seed, pieces = cli.pieces, "starting run");

    let mut player = AutoPlayer::new(ScriptedPlanner::repeating(script));
    let mut locked = 0u32;
    let mut ticks = 0u64;

    while !game.is_game_over() && !player.is_stopped() && locked < cli.pieces {
        if ticks >= MAX_TICKS {
            anyhow::bail!("no progress after {MAX_TICKS} ticks");
        }
        ticks += 1;

        player.update(&mut game, TICK_MS);
        if let Some(event) = game.take_last_event() {
            locked += 1;
            debug!(piece = locked, ?event, "locked");
        }
        game.tick(TICK_MS);
        if let Some(event) = game.take_last_event() {
            locked += 1;
            debug!(piece = locked, ?event, "locked");
        }
    }

    info!(
        score = game.score(),
        lines = game.lines(),
        pieces = locked,
        game_over = ?game.game_over_reason(),
        "run finished"
    );

    let json = serde_json::to_string_pretty(&game.snapshot()).context("serializing snapshot")?;
    println!("{json}");
    Ok(())
}
