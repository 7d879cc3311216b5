use anyhow::Result;

use crate::cli::EdgeStyle;
use crate::style::{build_stylesheet, node_centered};

/// Print the composed stylesheet as Cytoscape JSON. Works offline, which
/// also makes the palette and cascade behavior scriptable and testable.
pub fn run(labels: Vec<String>, seed: u64, edge_style: EdgeStyle) -> Result<()> {
    let stylesheet = build_stylesheet(node_centered(), edge_style.base_rule(), &labels, seed)?;
    println!("{}", serde_json::to_string_pretty(&stylesheet)?);
    Ok(())
}
