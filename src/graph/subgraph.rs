use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node matched by a query.
///
/// `labels` keeps the database's label order; the first entry is treated as
/// the node's primary label for styling purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphNode {
    pub id: i64,
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

impl SubgraphNode {
    /// The label used for grouping and styling.
    pub fn primary_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// All node properties rendered as `key: value` lines, surfaced as the
    /// node's tooltip when clicked.
    pub fn tooltip_text(&self) -> String {
        self.properties
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}: {s}"),
                other => format!("{k}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A relationship matched by a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphEdge {
    pub id: i64,
    pub source: i64,
    pub target: i64,
    pub rel_type: String,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

/// Anything that can enumerate the distinct node labels of a query result
/// in a stable order. The style resolver depends on nothing else.
pub trait LabelSource {
    fn labels(&self) -> Vec<String>;
}

/// The nodes and relationships returned by one query, deduplicated by
/// element id. Built fresh per query and discarded after rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subgraph {
    nodes: IndexMap<i64, SubgraphNode>,
    edges: IndexMap<i64, SubgraphEdge>,
}

impl Subgraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, ignoring duplicates of an id already present.
    pub fn add_node(&mut self, node: SubgraphNode) {
        self.nodes.entry(node.id).or_insert(node);
    }

    /// Add an edge, ignoring duplicates of an id already present.
    pub fn add_edge(&mut self, edge: SubgraphEdge) {
        self.edges.entry(edge.id).or_insert(edge);
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SubgraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &SubgraphEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl LabelSource for Subgraph {
    /// Distinct primary node labels in first-seen order. The palette is
    /// paired against this order, so it must be stable for a given result.
    fn labels(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for node in self.nodes.values() {
            if let Some(label) = node.primary_label() {
                if !seen.iter().any(|s| s == label) {
                    seen.push(label.to_string());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, labels: &[&str]) -> SubgraphNode {
        SubgraphNode {
            id,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            properties: IndexMap::new(),
        }
    }

    #[test]
    fn test_labels_first_seen_order() {
        let mut sg = Subgraph::new();
        sg.add_node(node(1, &["City"]));
        sg.add_node(node(2, &["Country"]));
        sg.add_node(node(3, &["City"]));
        sg.add_node(node(4, &["World"]));
        assert_eq!(sg.labels(), vec!["City", "Country", "World"]);
    }

    #[test]
    fn test_labels_empty_subgraph() {
        assert!(Subgraph::new().labels().is_empty());
    }

    #[test]
    fn test_unlabeled_nodes_are_skipped() {
        let mut sg = Subgraph::new();
        sg.add_node(node(1, &[]));
        sg.add_node(node(2, &["Gene"]));
        assert_eq!(sg.labels(), vec!["Gene"]);
    }

    #[test]
    fn test_primary_label_is_first() {
        let n = node(1, &["Protein", "Macromolecule"]);
        assert_eq!(n.primary_label(), Some("Protein"));
    }

    #[test]
    fn test_duplicate_nodes_ignored() {
        let mut sg = Subgraph::new();
        sg.add_node(node(1, &["City"]));
        sg.add_node(node(1, &["City"]));
        assert_eq!(sg.node_count(), 1);
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let mut sg = Subgraph::new();
        let edge = SubgraphEdge {
            id: 7,
            source: 1,
            target: 2,
            rel_type: "IN".to_string(),
            properties: IndexMap::new(),
        };
        sg.add_edge(edge.clone());
        sg.add_edge(edge);
        assert_eq!(sg.edge_count(), 1);
    }

    #[test]
    fn test_tooltip_text_lists_properties() {
        let mut n = node(1, &["City"]);
        n.properties
            .insert("name".to_string(), Value::String("Skopje".to_string()));
        n.properties.insert("population".to_string(), Value::from(544806));
        let tooltip = n.tooltip_text();
        assert_eq!(tooltip, "name: Skopje\npopulation: 544806");
    }

    #[test]
    fn test_is_empty() {
        assert!(Subgraph::new().is_empty());
        let mut sg = Subgraph::new();
        sg.add_node(node(1, &["X"]));
        assert!(!sg.is_empty());
    }
}
