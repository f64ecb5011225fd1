//! `grobblebox` operator binary.
//!
//! Loads (or freshly initializes) a grid, runs it until a tick limit or
//! Ctrl-C, then writes the grid back to the same file.
//!
//! ```text
//! grobblebox grid.bin --fresh --ticks 500
//! grobblebox grid.bin --verbose
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use grobblebox::{ExecutionMode, Grid, Scheduler, persist};

/// Lock-step lattice of one-instruction cells
#[derive(Parser, Debug)]
#[command(name = "grobblebox")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Grid snapshot file, loaded at startup and saved on exit
    file: PathBuf,

    /// Start from a fresh grid without asking
    #[arg(short = 'y', long, visible_alias = "yes")]
    fresh: bool,

    /// Stop after this many generations (default: run until Ctrl-C)
    #[arg(short, long, value_name = "N")]
    ticks: Option<u64>,

    /// Step cells on one thread instead of the rayon pool
    #[arg(long)]
    sequential: bool,

    /// Enable debug output (per-tick wave/copy census)
    #[arg(short, long)]
    verbose: bool,

    /// Write a grayscale PNG of the accumulator field on exit
    #[arg(long, value_name = "PNG")]
    screenshot: Option<PathBuf>,
}

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone)]
struct RunConfig {
    file: PathBuf,
    fresh: bool,
    ticks: Option<u64>,
    mode: ExecutionMode,
    screenshot: Option<PathBuf>,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            file: cli.file,
            fresh: cli.fresh,
            ticks: cli.ticks,
            mode: if cli.sequential {
                ExecutionMode::Sequential
            } else {
                ExecutionMode::Parallel
            },
            screenshot: cli.screenshot,
        }
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Ask on stdin whether to start fresh. Anything but `y`/`yes` means load.
fn confirm_fresh() -> Result<bool> {
    print!("Initialize fresh grobblebox? [y/N] ");
    io::stdout().flush().context("failed to flush prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read answer from stdin")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn ctrlc_handler(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current tick");
            stop.store(true, Ordering::Relaxed);
        }
    });
}

async fn run(config: RunConfig) -> Result<()> {
    if config.screenshot.is_some() && !cfg!(feature = "screenshot") {
        bail!("--screenshot needs a build with the `screenshot` feature");
    }

    let fresh = config.fresh || confirm_fresh()?;
    let grid = if fresh {
        Grid::new()
    } else {
        persist::load(&config.file)
            .with_context(|| format!("failed to load grid from {}", config.file.display()))?
    };

    let stop = Arc::new(AtomicBool::new(false));
    ctrlc_handler(stop.clone());

    let scheduler = Scheduler::new(config.mode);
    let limit = config.ticks;
    info!(mode = ?scheduler.mode(), limit = ?limit, "running");
    let (grid, ran) = tokio::task::spawn_blocking(move || {
        let mut grid = grid;
        let ran = scheduler.run_until(&mut grid, &stop, limit);
        (grid, ran)
    })
    .await
    .context("scheduler thread panicked")?;

    info!(ran, census = ?grid.census(), "stopped");

    persist::save(&grid, &config.file)
        .with_context(|| format!("failed to save grid to {}", config.file.display()))?;

    #[cfg(feature = "screenshot")]
    if let Some(png) = &config.screenshot {
        grobblebox::screenshot::save_png(&grid, png)
            .with_context(|| format!("failed to write screenshot {}", png.display()))?;
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(RunConfig::from(cli)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
