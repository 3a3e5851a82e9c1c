//! class-traits - CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;

use class_traits::demo::{self, QueueTraits};
use class_traits::traits::{linearize, tag, IdentityStrategy, TraitId};
use class_traits::util::config::ComposeConfig;
use class_traits::util::logger;
use class_traits::{NAME, VERSION};

/// Compose runtime class traits and inspect the result
#[derive(Parser, Debug)]
#[command(name = "class-traits")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./class-traits.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Feed values through the Filter/Double/Increment/Base queue
    Queue {
        /// Values to put, each followed by one get
        #[arg(value_name = "VALUE", allow_negative_numbers = true, required = true)]
        values: Vec<i64>,
    },

    /// Show the constructor order of App extending derive(Baz)
    Construct,

    /// Print the source-text identifier a transformer text maps to
    Id {
        /// Transformer source text
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Print the queue composition's layer order, innermost first
    Linearize {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print version information
    Version,
}

#[derive(Serialize)]
struct LayerReport {
    position: usize,
    id: TraitId,
    supertraits: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let config = ComposeConfig::discover(args.config.as_deref(), &cwd)
        .context("Failed to load configuration")?;
    if args.verbose {
        logger::init_cli(true);
    } else {
        logger::init_with_level(config.log.level);
    }
    debug!(strategy = ?config.identity.strategy, "configuration loaded");

    let declarer = config.declarer();
    match args.command {
        Commands::Queue { values } => {
            let results =
                demo::run_queue(&declarer, &values).context("Queue composition failed")?;
            for (input, output) in values.iter().zip(results) {
                if output.is_undefined() {
                    println!("put {:>6} -> get {}", input, output.dimmed());
                } else {
                    println!("put {:>6} -> get {}", input, output.green());
                }
            }
        }
        Commands::Construct => {
            let order = demo::construction_order(&declarer).context("Construction failed")?;
            println!("{}", order.join(" -> ").bold());
        }
        Commands::Id { text } => {
            println!("{}", tag(&text));
            if declarer.strategy() == IdentityStrategy::PerDeclaration {
                println!(
                    "{}",
                    "note: per-declaration identity is active; declarations ignore this value"
                        .dimmed()
                );
            }
        }
        Commands::Linearize { json } => {
            let queue = QueueTraits::declare_with(&declarer);
            let order = linearize(queue.ordered()).context("Linearization failed")?;
            let report: Vec<LayerReport> = order
                .iter()
                .enumerate()
                .map(|(position, t)| LayerReport {
                    position,
                    id: t.id(),
                    supertraits: t.supertraits().len(),
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let class = queue.compose().context("Derivation failed")?;
                let names: Vec<_> = class.chain().map(|c| c.name().to_string()).collect();
                for (layer, name) in report.iter().zip(names.iter().rev().skip(1)) {
                    println!("[{}] {} {}", layer.position, name.cyan(), layer.id);
                }
            }
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}
