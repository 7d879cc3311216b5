pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::style::{StyleRule, edge_directed, edge_directed_named, edge_undirected};

#[derive(Parser)]
#[command(name = "graphscape")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Visualize Neo4j subgraphs with Cytoscape-style styling", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration and optionally start Neo4j
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// Run a Cypher pattern query and render the subgraph in the browser
    #[command(long_about = "Run a Cypher pattern query and render the subgraph in the browser.\n\n\
        Pattern queries conventionally return a path, e.g.\n\
        MATCH p=(:City{name:'Skopje'})-[:IN*]->(:World) RETURN p\n\n\
        Each distinct node label gets a reproducible color derived from the\n\
        palette seed; pass --seed to pick a different palette.")]
    Viz {
        /// Cypher query returning the subgraph to render
        query: String,

        /// Palette seed (defaults to the configured seed)
        #[arg(short, long, env = "GRAPHSCAPE_SEED")]
        seed: Option<u64>,

        /// Edge styling for the base stylesheet
        #[arg(short, long, default_value = "directed")]
        edge_style: EdgeStyle,

        /// Layout algorithm (dagre, klay, concentric, cola, ...)
        #[arg(short, long)]
        layout: Option<String>,

        /// Extra layout option as key=value (repeatable), passed through
        /// to the layout engine (e.g. nodeSpacing=65)
        #[arg(long = "layout-opt", value_name = "KEY=VALUE")]
        layout_opts: Vec<String>,

        /// Node data field shown as the tooltip on click
        #[arg(long, default_value = "tooltip")]
        tooltip: String,

        /// Write the HTML page here instead of the temp directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate the page without opening a browser
        #[arg(long, default_value = "false")]
        no_open: bool,
    },

    /// Print the distinct node labels of a query result
    Labels {
        /// Cypher query returning the subgraph to inspect
        query: String,
    },

    /// Print the stylesheet composed for a list of node labels
    #[command(long_about = "Print the stylesheet composed for a list of node labels.\n\n\
        Emits the base node rule, the base edge rule, and one background-color\n\
        override per label, as Cytoscape stylesheet JSON. No database needed.")]
    Style {
        /// Node labels to derive colors for, in presentation order
        labels: Vec<String>,

        /// Palette seed
        #[arg(short, long, default_value = "6")]
        seed: u64,

        /// Edge styling for the base stylesheet
        #[arg(short, long, default_value = "directed")]
        edge_style: EdgeStyle,
    },
}

/// Which canned edge rule goes into the base stylesheet.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum EdgeStyle {
    /// Arrow head towards the target node
    #[default]
    Directed,
    /// Arrow head plus the relationship name along the edge
    DirectedNamed,
    /// Plain line, for relationships whose direction is arbitrary
    Undirected,
}

impl EdgeStyle {
    pub fn base_rule(self) -> StyleRule {
        match self {
            EdgeStyle::Directed => edge_directed(),
            EdgeStyle::DirectedNamed => edge_directed_named(),
            EdgeStyle::Undirected => edge_undirected(),
        }
    }
}

impl std::fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeStyle::Directed => write!(f, "directed"),
            EdgeStyle::DirectedNamed => write!(f, "directed-named"),
            EdgeStyle::Undirected => write!(f, "undirected"),
        }
    }
}
