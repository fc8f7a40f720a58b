//! yjconv CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "yjconv")]
#[command(version)]
#[command(about = "Convert between YAML and JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert YAML to JSON
    ToJson {
        /// Input file (reads stdin when omitted or '-')
        input: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Read floats at 64-bit instead of 32-bit precision
        #[arg(long)]
        double_precision: bool,
    },

    /// Convert JSON to YAML
    ToYaml {
        /// Input file (reads stdin when omitted or '-')
        input: Option<PathBuf>,

        /// Spaces per indentation level
        #[arg(long, default_value_t = yjconv::DEFAULT_INDENT)]
        indent: usize,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yjconv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ToJson {
            input,
            pretty,
            double_precision,
        } => commands::to_json::execute(commands::to_json::ToJsonArgs {
            input,
            pretty,
            double_precision,
        }),
        Commands::ToYaml { input, indent } => {
            commands::to_yaml::execute(commands::to_yaml::ToYamlArgs { input, indent })
        }
    }
}
