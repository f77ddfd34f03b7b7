//! Lanecount: line-crossing and origin–destination counting for tracked objects.
//!
//! Lanecount turns a stream of per-frame object motions (from an external
//! detector/tracker) into crossing events and aggregate counts over
//! user-defined boundary lines ("lanes"). Counts are kept per lane and object
//! type, or per entry/exit lane pair and object type for trip counting.
//!
//! # Modules
//!
//! - [`geom`]: Points, segments and the segment crossing kernel
//! - [`model`]: Lanes, identifiers, the type dictionary and tracker input
//! - [`counter`]: The simple and origin–destination counters
//! - [`config`]: Persisted counter configuration (JSON/YAML)
//! - [`validation`]: Configuration validation and error reporting
//! - [`report`]: Count reports as text, JSON or CSV
//! - [`frames`]: Recorded frame streams (JSON Lines)
//! - [`error`]: Error types for lanecount operations

pub mod config;
pub mod counter;
pub mod error;
pub mod frames;
pub mod geom;
pub mod model;
pub mod report;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::LaneCountError;

/// The lanecount CLI application.
#[derive(Parser)]
#[command(name = "lanecount")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a counter configuration for errors and warnings.
    Validate(ValidateArgs),
    /// Replay a recorded frame stream through a counter and print the counts.
    Count(CountArgs),
    /// Show the counter a configuration builds: kind, lanes and tally keys.
    Inspect(InspectArgs),
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Counter configuration to validate (.json, .yaml or .yml).
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the count subcommand.
#[derive(clap::Args)]
struct CountArgs {
    /// Counter configuration (.json, .yaml or .yml).
    config: PathBuf,

    /// Frame stream in JSON Lines format.
    frames: PathBuf,

    /// Output format for the counts ('text', 'json' or 'csv').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Counter configuration (.json, .yaml or .yml).
    config: PathBuf,
}

/// Run the lanecount CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LaneCountError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Count(args)) => run_count(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("lanecount {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Line-crossing and origin-destination counting for tracked objects.");
            println!();
            println!("Run 'lanecount --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), LaneCountError> {
    let config = config::io::read_config(&args.input)?;

    let report = validation::validate_config(&config);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": report.issues,
            });
            let rendered = serde_json::to_string_pretty(&json)
                .map_err(|source| LaneCountError::ReportJsonWrite { source })?;
            println!("{}", rendered);
        }
        "text" => print!("{}", report),
        other => {
            return Err(LaneCountError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(LaneCountError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the count subcommand.
fn run_count(args: CountArgs) -> Result<(), LaneCountError> {
    let render: fn(&report::CountReport) -> Result<String, LaneCountError> =
        match args.output.as_str() {
            "text" => |r| Ok(r.to_string()),
            "json" => |r| r.to_json_string().map(|s| s + "\n"),
            "csv" => report::CountReport::to_csv_string,
            other => {
                return Err(LaneCountError::UnsupportedFormat(format!(
                    "'{}' (supported: text, json, csv)",
                    other
                )));
            }
        };

    let config = config::io::read_config(&args.config)?;
    let mut counter = config.build_counter()?;
    let frames = frames::read_frames(&args.frames)?;

    let mut last_index = None;
    for frame in &frames {
        let idle = skipped_frames(last_index, frame.frame, config.max_unseen_frames);
        if idle > 0 {
            tracing::debug!(idle, index = ?frame.frame, "replaying empty frames for a gap");
        }
        for _ in 0..idle {
            counter.process(&[])?;
        }
        counter.process(&frame.segments)?;
        last_index = frame.frame.or(last_index);
    }

    let report = report::CountReport::from_counter(&counter, config.id, config.name.clone());
    print!("{}", render(&report)?);
    Ok(())
}

/// Empty frames to replay before a frame at `index` when the stream skipped
/// indices, so that tracked objects still age across the gap.
///
/// Capped at `max_unseen + 1`, enough to evict anything stale. Without
/// eviction an empty frame changes nothing, so no frames are replayed.
fn skipped_frames(last: Option<u64>, index: Option<u64>, max_unseen: Option<u64>) -> u64 {
    match (last, index, max_unseen) {
        (Some(last), Some(index), Some(max_unseen)) => index
            .saturating_sub(last)
            .saturating_sub(1)
            .min(max_unseen.saturating_add(1)),
        _ => 0,
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), LaneCountError> {
    let config = config::io::read_config(&args.config)?;
    let counter = config.build_counter()?;

    println!(
        "Counter {} '{}': {} counter",
        config.id,
        config.name,
        counter.kind()
    );
    println!();
    println!("Lanes:");
    for lane in counter.lanes() {
        println!(
            "  {:>4}  {:<8} {:<20} {:?}",
            lane.id.as_u64(),
            lane.role.as_str(),
            lane.name,
            lane.boundary
        );
    }
    println!();
    println!("Types:");
    for (code, name) in counter.types().iter() {
        println!("  {:>4}  {}", code.as_u32(), name);
    }
    println!();

    let keys = match counter.counts() {
        counter::CountSnapshot::Simple(table) => table.keys().count(),
        counter::CountSnapshot::OriginDestination(table) => table.keys().count(),
    };
    println!(
        "Tally: {} lane key(s) x {} type(s) = {} cell(s)",
        keys,
        counter.types().len(),
        keys * counter.types().len()
    );
    println!("Containment: {:?}", config.containment);
    match config.max_unseen_frames {
        Some(frames) => println!("Eviction: after {} unseen frame(s)", frames),
        None => println!("Eviction: disabled"),
    }
    Ok(())
}
