#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that authors and runs Snack Attack levels headlessly.

mod demo;
mod settings;
mod simulation;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Snack Attack level tools
#[derive(Debug, Parser)]
#[command(name = "snack-attack", about = "Author and simulate Snack Attack mazes", version)]
struct Cli {
    /// TOML file overriding the default settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `snack_attack_world=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Paint the built-in demo maze and report what the builder accepted
    Validate,

    /// Run the demo maze without a window and print a summary
    Simulate {
        /// Number of fixed steps to run
        #[arg(long, default_value_t = 7_200)]
        ticks: u64,

        /// Seed of the enemy decision stream
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Entry point for the Snack Attack command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    match cli.command {
        Command::Validate => validate(&settings),
        Command::Simulate { ticks, seed } => {
            if let Some(seed) = seed {
                settings.seed = seed;
            }
            simulate(&settings, ticks)
        }
    }
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level `{level}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn validate(settings: &Settings) -> Result<()> {
    let canvas = settings.canvas();
    let authoring = demo::author(canvas, settings.spacing());

    println!(
        "canvas {}x{} brush {} spacing {}",
        canvas.columns,
        canvas.rows,
        canvas.brush_width,
        settings.spacing()
    );
    println!("accepted tiles: {}", authoring.accepted);
    for refused in &authoring.rejected {
        println!("refused: {refused:?}");
    }

    let layout = authoring
        .builder
        .into_layout()
        .context("demo maze does not form a level layout")?;
    if !authoring.rejected.is_empty() {
        bail!("{} demo tiles were refused", authoring.rejected.len());
    }

    println!("layout ok: {} walkable cells", layout.grid().walkable_count());
    Ok(())
}

fn simulate(settings: &Settings, ticks: u64) -> Result<()> {
    let layout = demo::author(settings.canvas(), settings.spacing())
        .builder
        .into_layout()
        .context("demo maze does not form a level layout")?;

    tracing::info!(ticks, seed = settings.seed, "starting headless simulation");
    let summary = simulation::simulate(layout, settings, ticks);
    println!("{summary}");
    Ok(())
}
