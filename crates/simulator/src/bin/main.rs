//! MLFQ Simulator CLI
//!
//! Run a multilevel feedback queue simulation and print its trace and summary.
//!
//! # Example
//!
//! ```bash
//! # Run the built-in seven-process workload with default parameters
//! mlfq-sim run
//!
//! # Run a workload file with a larger quantum and non-preemptive SJF
//! mlfq-sim run --workload jobs.toml --quantum 4 --no-preempt
//!
//! # Emit the trace as JSON lines
//! mlfq-sim run --format json
//!
//! # Write a reproducible random workload
//! mlfq-sim generate --count 12 --seed 7 > jobs.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mlfq_core::TraceEvent;
use mlfq_scheduler::SchedulerConfig;
use mlfq_simulation::{run_scheduler, SimulationOutcome};
use mlfq_simulator::{RandomWorkload, SimulationReport, WorkloadFile};
use mlfq_types::Tick;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mlfq-sim")]
#[command(version, about = "Multilevel feedback queue CPU scheduling simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per event, then a summary table
    Text,
    /// One JSON object per event, then the summary object
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation
    Run {
        /// Workload file (TOML). Uses the built-in workload when omitted.
        #[arg(short, long)]
        workload: Option<PathBuf>,

        /// Round-robin time quantum
        #[arg(short, long)]
        quantum: Option<Tick>,

        /// Ticks a process may wait before promotion
        #[arg(long)]
        aging_threshold: Option<Tick>,

        /// Accumulated run time that triggers demotion
        #[arg(long)]
        demotion_threshold: Option<Tick>,

        /// Disable SJF preemption in Q2
        #[arg(long)]
        no_preempt: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Log filter (overrides RUST_LOG)
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Generate a random workload file
    Generate {
        /// Number of processes
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Random seed. When omitted, a random seed is used.
        #[arg(long)]
        seed: Option<u64>,

        /// Largest gap between consecutive arrivals
        #[arg(long, default_value = "5")]
        max_gap: Tick,

        /// Largest burst time
        #[arg(long, default_value = "20")]
        max_burst: Tick,
    },
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Apply command-line overrides on top of the file's parameters.
fn scheduler_config(
    base: SchedulerConfig,
    quantum: Option<Tick>,
    aging_threshold: Option<Tick>,
    demotion_threshold: Option<Tick>,
    no_preempt: bool,
) -> SchedulerConfig {
    let mut config = base;
    if let Some(quantum) = quantum {
        config = config.with_quantum(quantum);
    }
    if let Some(threshold) = aging_threshold {
        config = config.with_aging_threshold(threshold);
    }
    if let Some(threshold) = demotion_threshold {
        config = config.with_demotion_threshold(threshold);
    }
    if no_preempt {
        config = config.with_preemptive_sjf(false);
    }
    config
}

fn run(workload: WorkloadFile, config: SchedulerConfig, format: OutputFormat) -> Result<()> {
    let registry = workload.registry().context("Invalid workload")?;
    let trace = run_scheduler(registry, config).context("Invalid scheduler configuration")?;

    // Events are printed as they are produced; the trace is consumed lazily.
    let mut events = Vec::new();
    let mut statistics = None;
    for event in trace {
        let event = event.context("Simulation aborted")?;
        match format {
            OutputFormat::Text if !event.is_statistics() => println!("{event}"),
            OutputFormat::Text => {}
            OutputFormat::Json => println!("{}", serde_json::to_string(&event)?),
        }
        match event {
            TraceEvent::Statistics(snapshot) => statistics = Some(snapshot),
            other => events.push(other),
        }
    }

    let statistics = statistics.context("Trace ended without statistics")?;
    let report = SimulationReport::new(&SimulationOutcome { events, statistics });
    match format {
        OutputFormat::Text => report.print(),
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            workload,
            quantum,
            aging_threshold,
            demotion_threshold,
            no_preempt,
            format,
            log_level,
        } => {
            init_tracing(log_level.as_deref());

            let workload = match &workload {
                Some(path) => WorkloadFile::load(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => WorkloadFile::reference(),
            };
            let config = scheduler_config(
                workload.scheduler_config(),
                quantum,
                aging_threshold,
                demotion_threshold,
                no_preempt,
            );
            info!(processes = workload.processes.len(), "Workload loaded");

            run(workload, config, format)?;
        }

        Commands::Generate {
            count,
            seed,
            max_gap,
            max_burst,
        } => {
            // No tracing for generate: output goes to stdout
            let seed = seed.unwrap_or_else(rand::random);
            let processes = RandomWorkload::new()
                .with_max_arrival_gap(max_gap)
                .with_burst_range(1, max_burst)
                .generate_seeded(count, seed);

            let text = WorkloadFile::new(processes)
                .with_scheduler(SchedulerConfig::default())
                .to_toml_string()?;
            println!("# seed = {seed}");
            print!("{text}");
        }
    }

    Ok(())
}
