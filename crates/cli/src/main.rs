//! Register renaming trace driver.
//!
//! This binary replays rename traces through the rename core. It performs:
//! 1. **Trace run:** Load a JSON trace of rename, branch, commit, and squash events and print each outcome.
//! 2. **Defaults:** Print the built-in configuration as JSON, as a starting point for `--config`.

mod replay;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use o3rename_core::common::RegClass;
use o3rename_core::{Config, RenameStage};

use crate::replay::ReplayError;

#[derive(Parser, Debug)]
#[command(
    name = "o3rename",
    author,
    version,
    about = "Register renaming trace driver",
    long_about = "Replay a JSON trace of rename events through a speculative rename map.\n\nEach event outcome is printed as one JSON line, followed by the final statistics.\n\nExamples:\n  o3rename run trace.json\n  o3rename run trace.json --config regs.json --dump\n  RUST_LOG=trace o3rename run trace.json\n  o3rename defaults > regs.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace file.
    Run {
        /// JSON array of trace events.
        #[arg(value_name = "TRACE")]
        trace_file: PathBuf,

        /// JSON configuration file (defaults are used for missing fields).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print every class's final mapping after the trace.
        #[arg(long)]
        dump: bool,

        /// Log checkpoint activity and map dumps (debug level).
        #[arg(long)]
        trace: bool,

        /// Print statistics as a table instead of JSON.
        #[arg(long)]
        table: bool,
    },

    /// Print the default configuration.
    Defaults,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace_file,
            config,
            dump,
            trace,
            table,
        } => {
            if let Err(e) = cmd_run(&trace_file, config.as_deref(), dump, trace, table) {
                eprintln!("\n[!] FATAL: {e}");
                process::exit(1);
            }
        }
        Commands::Defaults => match serde_json::to_string_pretty(&Config::default()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("[!] FATAL: {e}");
                process::exit(1);
            }
        },
    }
}

/// Installs the log subscriber on stderr. `RUST_LOG` wins unless `force_debug` is set.
fn init_logging(force_debug: bool) {
    let filter = if force_debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the configuration and trace, then replays the trace through a fresh rename stage.
///
/// Outcomes go to stdout as JSON lines. The first failing event ends the run.
fn cmd_run(
    trace_file: &Path,
    config: Option<&Path>,
    dump: bool,
    trace: bool,
    table: bool,
) -> Result<(), ReplayError> {
    let config = match config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    init_logging(trace || config.general.trace);

    let events = replay::load_trace(trace_file)?;
    let mut stage = RenameStage::new(&config).map_err(ReplayError::Setup)?;
    info!(events = events.len(), file = %trace_file.display(), "replaying trace");

    replay::replay(&mut stage, &events, |outcome| {
        if let Ok(line) = serde_json::to_string(outcome) {
            println!("{line}");
        }
    })?;

    if dump {
        for class in RegClass::RENAMEABLE {
            let outcome = replay::EventOutcome::Dump {
                class,
                map: stage.dump(class),
                map_brs: stage.dump_brs(class),
            };
            println!("{}", serde_json::to_string(&outcome)?);
        }
    }

    if table {
        stage.stats().print();
    } else {
        println!("{}", serde_json::to_string(stage.stats())?);
    }
    Ok(())
}
