#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Tower Defence simulation headlessly.

mod config;
mod headless;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tower_defence_core::{EnemyRemoval, Event};
use tower_defence_rendering::{
    FrameClock, Palette, Presentation, RenderingBackend, Scene, SceneSnapshot,
};
use tower_defence_simulation::Simulation;

use crate::headless::HeadlessBackend;

/// Runs the classic Tower Defence level and prints the HUD counters.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Print the HUD every N frames; 0 prints only the final line.
    #[arg(long, default_value_t = 60)]
    hud_every: u64,

    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Entry point for the Tower Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    let spawn_cap = config.spawn.cap;
    let mut simulation =
        Simulation::classic(config).context("failed to start the classic level")?;

    let clock = FrameClock::new(cli.fps)?;
    let palette = Palette::default();
    let scene = Scene::new(simulation.grid(), &palette);
    let presentation = Presentation::new("Tower Defence", palette.clear, scene);

    let mut leaked = 0_u32;
    let mut killed = 0_u32;
    let backend = HeadlessBackend::stdout(clock, cli.ticks, cli.hud_every);
    backend.run(presentation, move |dt, scene| {
        for event in simulation.advance(dt) {
            match event {
                Event::EnemyReachedEnd { enemy } => {
                    info!("enemy {} reached the end of the route", enemy.get());
                }
                Event::EnemyRemoved { cause, .. } => match cause {
                    EnemyRemoval::Killed => killed += 1,
                    EnemyRemoval::Leaked => leaked += 1,
                },
                _ => {}
            }
        }

        let enemies = simulation.enemies();
        let turrets = simulation.turrets();
        let projectiles = simulation.projectiles();
        let counters = simulation.counters();
        scene.refresh(
            SceneSnapshot {
                enemies: &enemies,
                turrets: &turrets,
                projectiles: &projectiles,
                counters,
                config: simulation.config(),
            },
            &palette,
        );

        let wave_over = counters.total_spawned >= spawn_cap && counters.live_enemies == 0;
        if wave_over {
            info!("wave over: {killed} killed, {leaked} leaked");
        }
        !wave_over
    })
}
