use anyhow::{Context, Result};
use indexmap::IndexMap;
use neo4rs::{Graph, Node, Path, Relation, Row, UnboundedRelation, query};
use serde_json::Value;

use super::subgraph::{Subgraph, SubgraphEdge, SubgraphNode};
use crate::config::Neo4jConfig;

/// Column names probed for graph elements in each result row. Pattern
/// queries conventionally return a path (`MATCH p=... RETURN p`), but bare
/// node and relationship columns are picked up as well.
const RESULT_COLUMNS: &[&str] = &[
    "p", "path", "n", "m", "a", "b", "node", "r", "rel", "edge",
];

/// Neo4j client for running pattern queries and collecting subgraphs
pub struct Neo4jClient {
    graph: Graph,
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(config: &Neo4jConfig) -> Result<Self> {
        let graph = Graph::new(&config.uri, &config.user, &config.password)
            .await
            .context("Failed to connect to Neo4j. Is Neo4j running?")?;

        Ok(Self { graph })
    }

    /// Run a Cypher query and accumulate every node, relationship, and path
    /// it returns into a deduplicated subgraph. An empty result is a valid
    /// empty subgraph, not an error.
    pub async fn run_subgraph(&self, cypher: &str) -> Result<Subgraph> {
        let mut result = self
            .graph
            .execute(query(cypher))
            .await
            .context("Failed to execute Cypher query")?;

        let mut subgraph = Subgraph::new();
        let mut rows = 0usize;
        while let Some(row) = result
            .next()
            .await
            .context("Failed to read query results")?
        {
            rows += 1;
            collect_row(&row, &mut subgraph);
        }

        if nothing_extracted(rows, &subgraph) {
            tracing::warn!(
                rows,
                "query returned rows but no graph elements; alias paths, nodes, \
                 or relationships as one of {RESULT_COLUMNS:?}"
            );
        }

        tracing::debug!(
            nodes = subgraph.node_count(),
            edges = subgraph.edge_count(),
            "accumulated subgraph"
        );

        Ok(subgraph)
    }
}

/// True when rows came back but none carried a recognizable graph element,
/// typically because the RETURN clause used an alias outside
/// [`RESULT_COLUMNS`]. The empty page would otherwise be indistinguishable
/// from a query that matched nothing.
fn nothing_extracted(rows: usize, subgraph: &Subgraph) -> bool {
    rows > 0 && subgraph.is_empty()
}

/// Pull graph elements out of one result row.
fn collect_row(row: &Row, subgraph: &mut Subgraph) {
    for col in RESULT_COLUMNS {
        if let Ok(path) = row.get::<Path>(col) {
            collect_path(&path, subgraph);
        } else if let Ok(node) = row.get::<Node>(col) {
            subgraph.add_node(convert_node(&node));
        } else if let Ok(rel) = row.get::<Relation>(col) {
            subgraph.add_edge(convert_rel(&rel));
        }
    }
}

/// Collect a path's nodes and relationships. Relationships inside a path
/// arrive without endpoints, so these are resolved against the path's node
/// list via the index sequence.
fn collect_path(path: &Path, subgraph: &mut Subgraph) {
    let nodes = path.nodes();
    for node in &nodes {
        subgraph.add_node(convert_node(node));
    }

    let node_ids: Vec<i64> = nodes.iter().map(Node::id).collect();
    let rels = path.rels();
    for (slot, source, target) in path_segments(&node_ids, &path.indices()) {
        if let Some(rel) = rels.get(slot) {
            subgraph.add_edge(convert_path_rel(rel, source, target));
        }
    }
}

/// Resolve relationship endpoints from a path's wire encoding: the first
/// node is the start, and the index list alternates a one-based signed
/// relationship slot (negative when the relationship is traversed against
/// its stored direction) with a zero-based index into the node list.
///
/// Returns `(relationship slot, source id, target id)` per segment, in
/// traversal order. Stops at the first malformed entry; the remainder of a
/// broken index list cannot be trusted.
fn path_segments(node_ids: &[i64], indices: &[i64]) -> Vec<(usize, i64, i64)> {
    let Some(&start) = node_ids.first() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut last = start;
    for pair in indices.chunks_exact(2) {
        let rel_index = pair[0];
        let slot = rel_index.unsigned_abs() as usize;
        if slot == 0 {
            break;
        }
        let next = match usize::try_from(pair[1])
            .ok()
            .and_then(|i| node_ids.get(i).copied())
        {
            Some(id) => id,
            None => break,
        };

        let (source, target) = if rel_index > 0 {
            (last, next)
        } else {
            (next, last)
        };
        segments.push((slot - 1, source, target));
        last = next;
    }

    segments
}

fn convert_node(node: &Node) -> SubgraphNode {
    let mut properties = IndexMap::new();
    for key in node.keys() {
        let value = scalar_property(
            node.get::<String>(key).ok(),
            node.get::<i64>(key).ok(),
            node.get::<f64>(key).ok(),
            node.get::<bool>(key).ok(),
        );
        if let Some(value) = value {
            properties.insert(key.to_string(), value);
        }
    }

    SubgraphNode {
        id: node.id(),
        labels: node.labels().iter().map(|l| l.to_string()).collect(),
        properties,
    }
}

fn convert_rel(rel: &Relation) -> SubgraphEdge {
    let mut properties = IndexMap::new();
    for key in rel.keys() {
        let value = scalar_property(
            rel.get::<String>(key).ok(),
            rel.get::<i64>(key).ok(),
            rel.get::<f64>(key).ok(),
            rel.get::<bool>(key).ok(),
        );
        if let Some(value) = value {
            properties.insert(key.to_string(), value);
        }
    }

    SubgraphEdge {
        id: rel.id(),
        source: rel.start_node_id(),
        target: rel.end_node_id(),
        rel_type: rel.typ().to_string(),
        properties,
    }
}

fn convert_path_rel(rel: &UnboundedRelation, source: i64, target: i64) -> SubgraphEdge {
    let mut properties = IndexMap::new();
    for key in rel.keys() {
        let value = scalar_property(
            rel.get::<String>(key).ok(),
            rel.get::<i64>(key).ok(),
            rel.get::<f64>(key).ok(),
            rel.get::<bool>(key).ok(),
        );
        if let Some(value) = value {
            properties.insert(key.to_string(), value);
        }
    }

    SubgraphEdge {
        id: rel.id(),
        source,
        target,
        rel_type: rel.typ().to_string(),
        properties,
    }
}

/// First scalar representation that decoded. Non-scalar properties (lists,
/// maps, temporal types) are skipped rather than guessed at.
fn scalar_property(
    s: Option<String>,
    i: Option<i64>,
    f: Option<f64>,
    b: Option<bool>,
) -> Option<Value> {
    if let Some(s) = s {
        Some(Value::String(s))
    } else if let Some(i) = i {
        Some(Value::from(i))
    } else if let Some(f) = f {
        serde_json::Number::from_f64(f).map(Value::Number)
    } else {
        b.map(Value::Bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment_forward() {
        let segments = path_segments(&[10, 20], &[1, 1]);
        assert_eq!(segments, vec![(0, 10, 20)]);
    }

    #[test]
    fn test_path_segment_reversed() {
        // Negative slot: the relationship is stored pointing the other way.
        let segments = path_segments(&[10, 20], &[-1, 1]);
        assert_eq!(segments, vec![(0, 20, 10)]);
    }

    #[test]
    fn test_path_segments_chain() {
        let segments = path_segments(&[1, 2, 3], &[1, 1, 2, 2]);
        assert_eq!(segments, vec![(0, 1, 2), (1, 2, 3)]);
    }

    #[test]
    fn test_path_segments_mixed_directions() {
        // (5)-[r1]->(6)<-[r2]-(7): second hop traverses r2 backwards.
        let segments = path_segments(&[5, 6, 7], &[1, 1, -2, 2]);
        assert_eq!(segments, vec![(0, 5, 6), (1, 7, 6)]);
    }

    #[test]
    fn test_single_node_path_has_no_segments() {
        assert!(path_segments(&[10], &[]).is_empty());
    }

    #[test]
    fn test_empty_path() {
        assert!(path_segments(&[], &[]).is_empty());
    }

    #[test]
    fn test_path_stops_at_bad_node_index() {
        assert!(path_segments(&[1, 2], &[1, 9]).is_empty());
    }

    #[test]
    fn test_path_stops_at_zero_relationship_slot() {
        assert!(path_segments(&[1, 2], &[0, 1]).is_empty());
    }

    #[test]
    fn test_path_ignores_trailing_odd_index() {
        let segments = path_segments(&[1, 2], &[1, 1, 2]);
        assert_eq!(segments, vec![(0, 1, 2)]);
    }

    #[test]
    fn test_nothing_extracted_flags_unrecognized_rows() {
        assert!(!nothing_extracted(0, &Subgraph::new()));
        assert!(nothing_extracted(3, &Subgraph::new()));

        let mut sg = Subgraph::new();
        sg.add_node(SubgraphNode {
            id: 1,
            labels: vec!["City".to_string()],
            properties: IndexMap::new(),
        });
        assert!(!nothing_extracted(3, &sg));
    }

    #[test]
    fn test_scalar_property_prefers_string() {
        let value = scalar_property(Some("x".into()), Some(1), None, None);
        assert_eq!(value, Some(Value::String("x".into())));
    }

    #[test]
    fn test_scalar_property_integer() {
        assert_eq!(
            scalar_property(None, Some(42), None, None),
            Some(Value::from(42))
        );
    }

    #[test]
    fn test_scalar_property_float() {
        assert_eq!(
            scalar_property(None, None, Some(0.5), None),
            Some(Value::from(0.5))
        );
    }

    #[test]
    fn test_scalar_property_bool() {
        assert_eq!(
            scalar_property(None, None, None, Some(true)),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_scalar_property_nan_is_skipped() {
        assert_eq!(scalar_property(None, None, Some(f64::NAN), None), None);
    }

    #[test]
    fn test_scalar_property_none() {
        assert_eq!(scalar_property(None, None, None, None), None);
    }
}
