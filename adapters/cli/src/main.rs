#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Crawl session in the terminal.

mod input;
mod layout;
mod settings;
mod terminal;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use crawl_core::LayoutSource;
use crawl_rendering::{RenderingBackend, Scene};
use crawl_system_turn::{TurnController, TurnOutcome};
use crawl_world::query;
use input::{parse_inputs, Input};
use layout::{ArenaLayout, AsciiLayout};
use settings::{FileConfig, Overrides, Settings};
use terminal::TerminalBackend;

/// Turn-driven dungeon crawl played from the terminal.
#[derive(Debug, Parser)]
#[command(name = "crawl", version)]
struct Cli {
    /// Seed for layout generation and spawning.
    #[arg(long)]
    seed: Option<u64>,
    /// ASCII map file (`#` is a wall). A seeded arena is generated otherwise.
    #[arg(long)]
    map: Option<PathBuf>,
    /// TOML configuration file applied beneath the command-line flags.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Lets enemies react to the player's turns.
    #[arg(long)]
    enemy_movement: Option<bool>,
    /// Radius revealed around the player each turn.
    #[arg(long)]
    reveal_radius: Option<u32>,
    /// Arena width when no map file is given.
    #[arg(long)]
    columns: Option<u32>,
    /// Arena height when no map file is given.
    #[arg(long)]
    rows: Option<u32>,
    /// Inputs to play instead of reading stdin, e.g. `lljk` or `right,down`.
    #[arg(long)]
    script: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            map: self.map.clone(),
            enemy_movement: self.enemy_movement,
            reveal_radius: self.reveal_radius,
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// Entry point for the Crawl command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, cli.overrides());
    tracing::debug!(?settings, "settings resolved");

    let inputs: Box<dyn Iterator<Item = Input>> = match &cli.script {
        Some(script) => Box::new(
            parse_inputs(script)
                .context("invalid --script")?
                .into_iter(),
        ),
        None => Box::new(stdin_inputs()),
    };

    let stdout = io::stdout();
    let mut backend = TerminalBackend::new(stdout.lock());
    match &settings.map {
        Some(path) => {
            let layout = AsciiLayout::load(path)?;
            let config = settings.turn_config(layout.columns(), layout.rows());
            play(TurnController::new(config, layout), &mut backend, inputs)
        }
        None => {
            let layout = ArenaLayout::new(settings.seed, settings.pillar_one_in);
            let config = settings.turn_config(settings.columns, settings.rows);
            play(TurnController::new(config, layout), &mut backend, inputs)
        }
    }
}

fn stdin_inputs() -> impl Iterator<Item = Input> {
    io::stdin()
        .lock()
        .lines()
        .map_while(Result::ok)
        .flat_map(|line| match parse_inputs(&line) {
            Ok(inputs) => inputs,
            Err(error) => {
                tracing::warn!(%error, "ignoring input line");
                Vec::new()
            }
        })
}

fn play<L, W>(
    mut controller: TurnController<L>,
    backend: &mut TerminalBackend<W>,
    inputs: impl Iterator<Item = Input>,
) -> Result<()>
where
    L: LayoutSource,
    W: Write,
{
    let mut events = Vec::new();
    let mut world = controller
        .bootstrap(&mut events)
        .context("failed to build the first dungeon")?;
    backend.present(&Scene::capture(&world))?;

    for input in inputs {
        let Input::Intent(direction) = input else {
            break;
        };
        events.clear();
        let outcome = controller
            .handle(&mut world, direction, &mut events)
            .context("failed to rebuild the dungeon")?;
        tracing::debug!(?direction, ?outcome, events = events.len(), "turn handled");
        if outcome == TurnOutcome::Ignored {
            continue;
        }
        backend.announce(&events)?;
        backend.present(&Scene::capture(&world))?;
    }

    tracing::info!(deaths = query::deaths(&world), "session ended");
    Ok(())
}
