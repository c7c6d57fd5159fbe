//! Headless driver: runs the simulation at the fixed tick rate and logs
//! what happens, with no renderer attached.

use std::time::Instant;

use anyhow::Context;
use maze_chase::constants::{LOOP_TIME, TICK_RATE};
use maze_chase::game::Game;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ticks: u32 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("tick count must be a number")?
        .unwrap_or(3600);

    let mut game = Game::default_level().context("failed to build level")?;
    info!(ticks, "starting headless run");

    let dt = 1.0 / TICK_RATE;
    for tick in 0..ticks {
        let started = Instant::now();
        game.tick(dt);

        for event in game.take_events() {
            info!(tick, ?event, "event");
        }
        for err in game.take_errors() {
            error!(tick, %err, "runtime error");
        }

        let elapsed = started.elapsed();
        if elapsed < LOOP_TIME {
            std::thread::sleep(LOOP_TIME - elapsed);
        }
    }

    info!("run complete");
    Ok(())
}
