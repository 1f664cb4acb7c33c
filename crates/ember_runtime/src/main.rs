//! Emberfall headless runtime
//!
//! Plays a level without a renderer: loads the run configuration, builds the
//! level manifest into a game session and runs it for a fixed number of
//! ticks with scripted input.
//!
//! Run with: cargo run -p ember_runtime -- levels/frozen_hollow.json
//!       or: EMBERFALL_LEVEL=levels/frozen_hollow.json cargo run --bin emberfall

mod error;
mod headless;
mod run_config;

use error::RuntimeError;
use run_config::RunConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> error::Result<()> {
    let config = RunConfig::load()?;
    config.print_summary();

    let path = config.level.as_deref().ok_or(RuntimeError::NoLevel)?;
    let manifest = headless::load_manifest(path)?;
    let summary = headless::run(&config, &manifest)?;

    log::info!("Run finished:");
    log::info!("  Level: {}", summary.level);
    log::info!("  Ticks: {}", summary.ticks);
    log::info!("  Kills: {}, deaths: {}", summary.kills, summary.deaths);
    log::info!(
        "  Quests completed: {}, checkpoints: {}",
        summary.quests_completed,
        summary.checkpoints
    );
    if let Some(position) = summary.final_position {
        log::info!("  Final position: ({:.2}, {:.2})", position.x, position.y);
    }
    Ok(())
}
