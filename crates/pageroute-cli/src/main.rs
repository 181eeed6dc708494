// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use pageroute_cli::commands;
use pageroute_cli::commands::generate::FormatArg;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pageroute")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "File-system based route generation for Vue", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Quiet mode: only show errors (useful for CI)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the routes file once
    Generate {
        /// Output directory (defaults to [output].dir)
        #[arg(short, long)]
        out: Option<String>,
        /// Module format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Print the module instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Watch pages and layouts and regenerate on change
    Watch,
    /// Print the generated layout modules
    Layouts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Generate { out, format, stdout } => {
            commands::generate::run(out, format, stdout, cli.quiet).await
        }
        Commands::Watch => {
            commands::watch::run(cli.quiet).await
        }
        Commands::Layouts => {
            commands::layouts::run().await
        }
    }
}
