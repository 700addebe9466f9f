// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use formwire_cli::commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formwire")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Server actions for plain HTML forms", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new formwire project
    Init {
        /// Project name (defaults to current directory name)
        name: Option<String>,
    },
    /// Serve the todo application
    Serve {
        /// Port to run the server on (overrides formwire.toml)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (overrides formwire.toml)
        #[arg(long)]
        host: Option<String>,
    },
    /// List registered actions and their identifiers
    Actions,
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
        Commands::Init { name } => commands::init::run(name).await,
        Commands::Serve { port, host } => commands::serve::run(host, port).await,
        Commands::Actions => commands::actions::run().await,
    }
}
