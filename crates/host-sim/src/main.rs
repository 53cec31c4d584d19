//! Reference host for the RPG runtime.
//!
//! Loads content from a data directory, plays a scripted duel between a
//! player and an AI-driven ogre at a fixed tick rate, then shuts the runtime
//! down.
//!
//! ```bash
//! HOST_SIM_TICKS=400 HOST_SIM_TPS=0 RUST_LOG=runtime=debug cargo run -p host-sim
//! ```
mod abilities;
mod config;
mod host;
mod logging;
mod npc;
mod sim;

use std::time::Duration;

use anyhow::Result;
use config::SimConfig;
use sim::{HERO, OGRE, Simulation};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!(
        ticks = config.ticks,
        tps = config.ticks_per_second,
        "Starting host simulation"
    );

    let mut sim = Simulation::from_config(&config)?;
    run(&mut sim, &config).await?;

    tracing::info!(
        hero = ?sim.host().health(HERO),
        hero_mana = ?sim.runtime().mana(HERO),
        hero_speed = ?sim.host().movement_modifier(HERO),
        ogre = ?sim.host().health(OGRE),
        "Simulation finished"
    );
    sim.finish()?;

    tracing::info!("Host shutdown complete");
    Ok(())
}

async fn run(sim: &mut Simulation, config: &SimConfig) -> Result<()> {
    let mut interval = (config.ticks_per_second > 0).then(|| {
        let mut interval =
            tokio::time::interval(Duration::from_micros(1_000_000 / config.ticks_per_second));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval
    });

    for _ in 0..config.ticks {
        if let Some(interval) = interval.as_mut() {
            tokio::select! {
                _ = interval.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(tick = %sim.now(), "Interrupted");
                    break;
                }
            }
        }
        sim.step()?;
    }
    Ok(())
}
