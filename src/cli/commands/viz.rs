use anyhow::{Context, Result};
use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::EdgeStyle;
use crate::config::Config;
use crate::graph::neo4j::Neo4jClient;
use crate::graph::subgraph::LabelSource;
use crate::render::{Layout, parse_layout_option, render_page, write_and_open};
use crate::style::{build_stylesheet, node_centered};

static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static PALETTE: Emoji<'_, '_> = Emoji("🎨 ", "");
static BROWSER: Emoji<'_, '_> = Emoji("🌐 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

#[allow(clippy::too_many_arguments)]
pub async fn run(
    query: String,
    seed: Option<u64>,
    edge_style: EdgeStyle,
    layout: Option<String>,
    layout_opts: Vec<String>,
    tooltip: String,
    output: Option<PathBuf>,
    no_open: bool,
) -> Result<()> {
    println!();
    println!(
        "{}",
        style(" graphscape - Subgraph Visualization ").bold().reverse()
    );
    println!();

    // Load configuration
    let config =
        Config::load().context("Failed to load configuration. Run 'graphscape init' first.")?;
    let seed = seed.unwrap_or(config.seed);

    // Parse layout options before touching the network
    let mut layout_config = Layout::new(layout.unwrap_or(config.layout));
    for raw in &layout_opts {
        let (key, value) = parse_layout_option(raw)?;
        layout_config = layout_config.with_option(key, value);
    }

    // Connect to Neo4j and run the query
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}}", GRAPH))
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Fetching subgraph from Neo4j...");

    let client = Neo4jClient::new(&config.neo4j).await?;
    let subgraph = client.run_subgraph(&query).await?;

    spinner.finish_and_clear();
    println!(
        "{}Matched {} nodes, {} edges",
        CHECK,
        style(subgraph.node_count()).green().bold(),
        style(subgraph.edge_count()).green().bold()
    );

    if subgraph.is_empty() {
        println!();
        println!(
            "{}",
            style("Query matched nothing; rendering an empty page.").yellow()
        );
    }

    // Derive per-label colors and compose the stylesheet
    let labels = subgraph.labels();
    println!(
        "{}Node labels: {}",
        PALETTE,
        style(labels.join(", ")).cyan()
    );

    let stylesheet = build_stylesheet(node_centered(), edge_style.base_rule(), &labels, seed)?;

    // Render and open
    let html = render_page(&subgraph, &stylesheet, &layout_config, &tooltip)?;
    let html_path = write_and_open(&html, output.as_deref(), !no_open)?;

    println!();
    if !no_open {
        println!("{}Visualization opened in browser", BROWSER);
        println!();
    }
    println!(
        "{}File: {}",
        SPARKLE,
        style(html_path.display()).cyan().underlined()
    );

    Ok(())
}
