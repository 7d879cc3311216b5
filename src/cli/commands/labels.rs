use anyhow::{Context, Result};
use console::{Emoji, style};

use crate::config::Config;
use crate::graph::neo4j::Neo4jClient;
use crate::graph::subgraph::LabelSource;

static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");

pub async fn run(query: String) -> Result<()> {
    let config =
        Config::load().context("Failed to load configuration. Run 'graphscape init' first.")?;

    let client = Neo4jClient::new(&config.neo4j).await?;

    println!("{}Running query...", SEARCH);
    let subgraph = client.run_subgraph(&query).await?;

    let labels = subgraph.labels();
    if labels.is_empty() {
        println!();
        println!("{}", style("No labeled nodes matched.").yellow());
        return Ok(());
    }

    println!();
    println!(
        "Node labels ({}):",
        style(labels.len()).green().bold()
    );
    for label in &labels {
        println!("  {}", style(label).cyan());
    }

    Ok(())
}
