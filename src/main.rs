use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use perf_lab::config::{LabConfig, DEFAULT_CONFIG_FILE};
use perf_lab::{fib, julia, logging, paths, primes, report, squares};

#[derive(Parser)]
#[command(name = "perf-lab", version, about = "Small performance exercises: julia set, primes, fibonacci, worker pool, grid paths")]
struct Cli {
    /// TOML config file. Defaults to ./perf-lab.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON lines instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serial escape-time iteration over the default region.
    Julia {
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        max_iter: Option<u32>,
        /// Skip the checksum of the canonical run.
        #[arg(long)]
        no_verify: bool,
    },
    /// Primes up to a bound by trial division.
    Primes {
        #[arg(long)]
        size: Option<u64>,
    },
    /// Time naive recursive fibonacci.
    Fib {
        #[arg(long)]
        n: Option<u32>,
        #[arg(long)]
        repeat_n: Option<u32>,
        #[arg(long)]
        runs: Option<u32>,
        /// Also count recursive calls for `n`.
        #[arg(long)]
        calls: bool,
    },
    /// Map a slow square over a range on a worker pool.
    Squares {
        #[arg(long)]
        count: Option<u64>,
        #[arg(long)]
        delay_ms: Option<u64>,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Count unique paths through the built-in grids.
    Paths,
    /// Run every exercise with config values.
    All,
}

fn load_config(path: Option<&Path>) -> Result<LabConfig> {
    match path {
        Some(p) => LabConfig::load(p).with_context(|| format!("loading config {}", p.display())),
        None => LabConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))
            .with_context(|| format!("loading config {DEFAULT_CONFIG_FILE}")),
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", report::json_line(value)?);
    } else {
        text(value);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging.level);

    match cli.command {
        Command::Julia { width, max_iter, no_verify } => {
            config.apply_julia(width, max_iter, no_verify)?;
            run_julia(&config, cli.json)
        }
        Command::Primes { size } => {
            config.apply_primes(size)?;
            run_primes(&config, cli.json)
        }
        Command::Fib { n, repeat_n, runs, calls } => {
            config.apply_fib(n, repeat_n, runs)?;
            run_fib(&config, calls, cli.json)
        }
        Command::Squares { count, delay_ms, workers } => {
            config.apply_squares(count, delay_ms, workers)?;
            run_squares(&config, cli.json).await
        }
        Command::Paths => run_paths(cli.json),
        Command::All => {
            run_julia(&config, cli.json)?;
            run_primes(&config, cli.json)?;
            run_fib(&config, false, cli.json)?;
            run_squares(&config, cli.json).await?;
            run_paths(cli.json)
        }
    }
}

fn run_julia(config: &LabConfig, json: bool) -> Result<()> {
    let report = julia::run_julia_set(config.julia.width, config.julia.max_iter)?;
    if config.julia.should_verify() {
        julia::verify_checksum(&report, julia::EXPECTED_SUM)?;
    }
    emit(json, &report, |r| {
        println!("julia: {} x {} points, sum {}", r.width, r.height, r.sum);
        println!("calc_z_serial took {:.2} seconds", r.elapsed.as_secs_f64());
    })
}

fn run_primes(config: &LabConfig, json: bool) -> Result<()> {
    let report = primes::run_find_primes(config.primes.size);
    emit(json, &report, |r| {
        println!("primes found: {} (up to {})", r.count, r.size);
    })
}

fn run_fib(config: &LabConfig, calls: bool, json: bool) -> Result<()> {
    fib::verify_fib()?;

    let once = fib::time_once(config.fib.n);
    emit(json, &once, |t| {
        println!("fibonacci({}) = {}", t.n, t.value);
        println!("wall clock time: {:.4} seconds", t.timing.wall.as_secs_f64());
        match t.timing.cpu {
            Some(cpu) => println!("cpu time: {:.4} seconds", cpu.as_secs_f64()),
            None => println!("cpu time: unavailable"),
        }
    })?;

    let repeated = fib::time_repeated(config.fib.repeat_n, config.fib.runs)?;
    emit(json, &repeated, |t| {
        println!(
            "total time for {} runs: {:.4} seconds, average time {:.4} seconds",
            t.runs, t.total.as_secs_f64(), t.average.as_secs_f64()
        );
    })?;

    if calls {
        let profile = fib::profile_calls(config.fib.n);
        emit(json, &profile, |p| {
            println!("fibonacci({}) made {} calls in {:.4} seconds", p.n, p.calls, p.timing.wall.as_secs_f64());
        })?;
    }
    Ok(())
}

async fn run_squares(config: &LabConfig, json: bool) -> Result<()> {
    let pool = config.squares.pool()?;
    let report = squares::run_squares(config.squares.count, config.squares.delay(), pool).await?;
    emit(json, &report, |r| {
        println!("parallel execution took {:.4} seconds on {} workers", r.elapsed.as_secs_f64(), r.workers);
        println!("results: {:?}", r.results);
    })
}

fn run_paths(json: bool) -> Result<()> {
    for grid_report in paths::run_sample_grids()? {
        emit(json, &grid_report, |r| {
            println!("grid {}: {} unique paths", r.grid, r.unique_paths);
        })?;
    }
    Ok(())
}
