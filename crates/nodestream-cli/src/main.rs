//! Command-line tools for line-oriented tree exports.
//!
//! Every subcommand reads an export from stdin (or `--input`) and writes its
//! result to stdout. Diagnostics go to stderr; set `RUST_LOG` or pass `-v`
//! for more of them.

mod format;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use nodestream::{
    Event, EventReader, EventsExt, ParserOptions, StatsOptions, nodes, properties,
    statistics_with, write_events,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nodestream")]
#[command(about = "Inspect and filter line-oriented tree exports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Read the export from this file instead of stdin
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Only treat ASCII characters as whitespace
    #[arg(long, global = true)]
    ascii_whitespace: bool,

    /// Log more to stderr (-v for progress, -vv for debugging)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the fully qualified path of every node
    Nodes,
    /// Print the type and fully qualified path of every property
    Properties,
    /// Print the export without the subtree rooted at PATH
    Prune {
        /// Absolute path of the subtree to remove
        path: String,
    },
    /// Print the subtree rooted at PATH as a new export
    Subtree {
        /// Absolute path of the subtree to keep
        path: String,
    },
    /// Print statistics about the content
    Stats(StatsArgs),
    /// Validate the export and print it in normalized form
    Cat,
    /// Print the parsed events as JSON lines
    Events,
}

#[derive(Debug, clap::Args)]
struct StatsArgs {
    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,

    /// Width of the node depth buckets
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    node_depth_bucket: Option<usize>,

    /// Width of the property depth buckets
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    property_depth_bucket: Option<usize>,

    /// Growth factor of the value size buckets
    #[arg(long, value_parser = clap::value_parser!(u64).range(2..))]
    value_size_scale: Option<u64>,
}

impl StatsArgs {
    fn options(&self) -> StatsOptions {
        let defaults = StatsOptions::default();
        StatsOptions {
            node_depth_bucket_size: self
                .node_depth_bucket
                .unwrap_or(defaults.node_depth_bucket_size),
            property_depth_bucket_size: self
                .property_depth_bucket
                .unwrap_or(defaults.property_depth_bucket_size),
            value_size_bucket_scale: self
                .value_size_scale
                .unwrap_or(defaults.value_size_bucket_scale),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("nodestream: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    })
}

fn run(cli: &Cli) -> Result<()> {
    let input = open_input(cli.input.as_ref())?;
    let events = EventReader::with_options(
        input,
        ParserOptions {
            ascii_whitespace_only: cli.ascii_whitespace,
        },
    );
    let mut out = BufWriter::new(io::stdout().lock());

    match &cli.command {
        Command::Nodes => {
            tracing::info!("listing nodes");
            let mut count = 0usize;
            for path in nodes(events) {
                writeln!(out, "{}", path.context("Listing nodes")?)?;
                count += 1;
            }
            tracing::info!(count, "listed nodes");
        }
        Command::Properties => {
            tracing::info!("listing properties");
            let mut count = 0usize;
            for property in properties(events) {
                let property = property.context("Listing properties")?;
                writeln!(out, "{} {}", property.ty, property.path)?;
                count += 1;
            }
            tracing::info!(count, "listed properties");
        }
        Command::Prune { path } => {
            tracing::info!(target_path = %path, "pruning");
            let pruned = events.prune(path).context("Pruning")?;
            write_events(pruned, &mut out).context("Pruning")?;
        }
        Command::Subtree { path } => {
            tracing::info!(target_path = %path, "extracting subtree");
            let subtree = events.subtree(path).context("Extracting subtree")?;
            write_events(subtree, &mut out).context("Extracting subtree")?;
        }
        Command::Stats(args) => {
            let options = args.options();
            tracing::info!(?options, "computing statistics");
            let stats = statistics_with(options, events).context("Computing statistics")?;
            tracing::debug!(nodes = stats.nodes, properties = stats.properties, "done");
            if args.json {
                serde_json::to_writer_pretty(&mut out, &stats)?;
                writeln!(out)?;
            } else {
                format::write_stats(&mut out, &stats, &options)?;
            }
        }
        Command::Cat => {
            write_events(events, &mut out).context("Reading export")?;
        }
        Command::Events => {
            for event in events {
                serde_json::to_writer(&mut out, &event)?;
                writeln!(out)?;
                if let Event::Error(err) = event {
                    out.flush()?;
                    return Err(err).context("Reading export");
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}
