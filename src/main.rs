mod cli;
mod config;
mod graph;
mod render;
mod style;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing - only show warnings by default, use RUST_LOG=debug for more detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cli::commands::init::run(force).await?;
        }
        Commands::Viz {
            query,
            seed,
            edge_style,
            layout,
            layout_opts,
            tooltip,
            output,
            no_open,
        } => {
            cli::commands::viz::run(
                query,
                seed,
                edge_style,
                layout,
                layout_opts,
                tooltip,
                output,
                no_open,
            )
            .await?;
        }
        Commands::Labels { query } => {
            cli::commands::labels::run(query).await?;
        }
        Commands::Style {
            labels,
            seed,
            edge_style,
        } => {
            cli::commands::style::run(labels, seed, edge_style)?;
        }
    }

    Ok(())
}
