#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Snake Hunt session.

mod layout_transfer;
mod simulation;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_hunt_core::{AgentId, AiMode, ArenaLayout, GridBounds};
use snake_hunt_system_bootstrap::Bootstrap;
use snake_hunt_system_decision::DEFAULT_VISION_RANGE;
use snake_hunt_world::{query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::simulation::{Settings, Simulation};

/// Headless Snake Hunt simulation.
#[derive(Debug, Parser)]
#[command(name = "snake-hunt", version)]
struct Args {
    /// Number of columns in a generated open arena.
    #[arg(long, default_value_t = 20)]
    width: u32,

    /// Number of rows in a generated open arena.
    #[arg(long, default_value_t = 20)]
    height: u32,

    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Manhattan range within which the opponent spots the player.
    #[arg(long, default_value_t = DEFAULT_VISION_RANGE)]
    vision_range: u32,

    /// What the opponent paths toward.
    #[arg(long, value_enum, default_value_t = Mode::Opponent)]
    mode: Mode,

    /// Seed for patrol sampling and food placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Arena layout transfer string replacing the generated open arena.
    #[arg(long)]
    layout: Option<String>,

    /// Print the arena layout transfer string and exit.
    #[arg(long)]
    print_layout: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Patrol and chase the player once it is visible.
    Opponent,
    /// Head for the food every step.
    Food,
}

impl From<Mode> for AiMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Opponent => AiMode::OpponentChaser,
            Mode::Food => AiMode::FoodChaser,
        }
    }
}

/// Entry point for the Snake Hunt command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&World::new()));

    let layout = resolve_layout(&args)?;
    bootstrap
        .validate_layout(&layout)
        .context("arena layout is not playable")?;

    if args.print_layout {
        println!("{}", layout_transfer::encode(&layout)?);
        return Ok(());
    }

    let settings = Settings {
        tick: Duration::from_millis(args.tick_ms),
        opponent_mode: args.mode.into(),
        vision_range: args.vision_range,
        seed: args.seed,
    };

    let mut simulation = Simulation::new(layout, settings);
    let bounds = bootstrap
        .bounds(simulation.world())
        .context("arena was not configured")?;
    info!(
        width = bounds.width(),
        height = bounds.height(),
        ticks = args.ticks,
        "simulation started"
    );

    for _ in 0..args.ticks {
        simulation.step();
    }

    let summary = simulation.summary();
    let world = simulation.world();
    println!("ticks run:        {}", summary.ticks);
    println!("rounds restarted: {}", summary.rounds_restarted);
    println!("collisions:       {}", summary.collisions);
    println!("player meals:     {}", summary.player_meals);
    println!("opponent meals:   {}", summary.opponent_meals);
    println!("opponent state:   {:?}", simulation.opponent_state());
    for agent in AgentId::ALL {
        if let Some(snake) = query::snake(world, agent) {
            println!(
                "{agent:?}: head {:?}, length {}",
                snake.head(),
                snake.length()
            );
        }
    }

    Ok(())
}

/// `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn resolve_layout(args: &Args) -> Result<ArenaLayout> {
    if let Some(encoded) = &args.layout {
        return layout_transfer::decode(encoded).context("could not read --layout");
    }

    let width = i32::try_from(args.width).context("arena width is too large")?;
    let height = i32::try_from(args.height).context("arena height is too large")?;
    let bounds = GridBounds::new(0, width, 0, height)?;
    Ok(ArenaLayout::open(bounds))
}
