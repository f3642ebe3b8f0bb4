use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use ecsframe::{
    config::{Config, ConfigLoader},
    demo, logging,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless tower-defense runner")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override frame count
    #[arg(long)]
    frames: Option<u64>,

    /// Override frames per second (sets the per-frame delta)
    #[arg(long)]
    fps: Option<f64>,

    /// Override the log level filter
    #[arg(long)]
    log_level: Option<String>,

    /// Sleep between frames to run at wall-clock speed
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => Config::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    logging::init(&config.logging);

    let frames = cli.frames.unwrap_or(config.demo.frames);
    let fps = cli.fps.unwrap_or(config.demo.fps);
    if !(fps.is_finite() && fps > 0.0) {
        bail!("fps must be a positive number, got {fps}");
    }
    let dt = 1.0 / fps;
    let frame_budget = Duration::from_secs_f64(dt);

    let mut world = demo::build_world(&config);
    info!(frames, fps, "starting run");
    for _ in 0..frames {
        let frame_start = Instant::now();
        world.update(dt);
        if demo::game_state(&world).is_some_and(|state| state.game_over) {
            break;
        }
        if cli.realtime {
            if let Some(sleep) = frame_budget.checked_sub(frame_start.elapsed()) {
                thread::sleep(sleep);
            }
        }
    }

    let state = demo::game_state(&world).unwrap_or_default();
    info!(
        frames = world.frame(),
        spawned = state.enemies_spawned,
        killed = state.enemies_killed,
        leaked = state.enemies_leaked,
        game_over = state.game_over,
        "run finished"
    );
    println!(
        "Ran {} frames: {} spawned, {} killed, {} leaked, game over: {}",
        world.frame(),
        state.enemies_spawned,
        state.enemies_killed,
        state.enemies_leaked,
        state.game_over
    );
    Ok(())
}
