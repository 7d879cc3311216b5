use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::palette::random_color_palette;

/// Errors raised by stylesheet composition.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A single style property value: string, number, or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Num(f64),
    Str(String),
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Str(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Str(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Num(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

/// A selector plus its style declarations, in Cytoscape stylesheet shape:
/// `{"selector": ..., "style": {...}}`.
///
/// Declaration order is preserved; within a stylesheet, later rules win the
/// cascade for properties matched by more than one selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: IndexMap<String, StyleValue>,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            style: IndexMap::new(),
        }
    }

    pub fn with(mut self, property: &str, value: impl Into<StyleValue>) -> Self {
        self.style.insert(property.to_string(), value.into());
        self
    }
}

/// Base node rule: centered, wrapped label text sourced from `data(name)`.
pub fn node_centered() -> StyleRule {
    StyleRule::new("node")
        .with("font-size", "10")
        .with("label", "data(name)")
        .with("height", "60")
        .with("width", "80")
        .with("text-max-width", "80")
        .with("text-wrap", "wrap")
        .with("text-valign", "center")
        .with("background-color", "blue")
        .with("background-opacity", 0.6)
}

/// Base edge rule for directed relationships.
pub fn edge_directed() -> StyleRule {
    StyleRule::new("edge")
        .with("line-color", "#9dbaea")
        .with("target-arrow-shape", "triangle")
        .with("target-arrow-color", "#9dbaea")
        .with("curve-style", "bezier")
}

/// Base edge rule for directed relationships with the relationship
/// name drawn along the edge.
pub fn edge_directed_named() -> StyleRule {
    StyleRule::new("edge")
        .with("font-size", "8")
        .with("label", "data(name)")
        .with("line-color", "#9dbaea")
        .with("text-rotation", "autorotate")
        .with("target-arrow-shape", "triangle")
        .with("target-arrow-color", "#9dbaea")
        .with("curve-style", "bezier")
}

/// Base edge rule for undirected relationships (no arrow head).
pub fn edge_undirected() -> StyleRule {
    StyleRule::new("edge").with("line-color", "#9dbaea")
}

/// Build the complete stylesheet for a subgraph: the two base rules first,
/// then one background-color override per label in input order.
///
/// Rule order is load-bearing. The per-label rules must come after the base
/// node rule so that the cascade replaces only `background-color`, leaving
/// size, font, and label-text declarations from the base rule intact.
pub fn build_stylesheet(
    base_node: StyleRule,
    base_edge: StyleRule,
    labels: &[String],
    seed: u64,
) -> Result<Vec<StyleRule>, StyleError> {
    let palette = random_color_palette(labels.len(), seed);
    let mut stylesheet = vec![base_node, base_edge];
    stylesheet.extend(label_overrides(labels, &palette)?);
    Ok(stylesheet)
}

/// Pair each label with its palette color, producing one override rule per
/// label. Fails if the caller hands over mismatched lengths.
pub fn label_overrides(
    labels: &[String],
    palette: &[String],
) -> Result<Vec<StyleRule>, StyleError> {
    if labels.len() != palette.len() {
        return Err(StyleError::InvalidArgument(format!(
            "label count {} does not match palette size {}",
            labels.len(),
            palette.len()
        )));
    }

    Ok(labels
        .iter()
        .zip(palette)
        .map(|(label, color)| {
            StyleRule::new(format!("node[label = \"{label}\"]"))
                .with("background-color", color.as_str())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::DEFAULT_SEED;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_rules_first_and_unchanged() {
        let ls = labels(&["City", "Country", "World"]);
        let sheet =
            build_stylesheet(node_centered(), edge_directed(), &ls, DEFAULT_SEED).unwrap();
        assert_eq!(sheet.len(), 5);
        assert_eq!(sheet[0], node_centered());
        assert_eq!(sheet[1], edge_directed());
    }

    #[test]
    fn test_overrides_name_only_background_color() {
        let ls = labels(&["Protein", "Gene"]);
        let sheet =
            build_stylesheet(node_centered(), edge_undirected(), &ls, DEFAULT_SEED).unwrap();
        for rule in &sheet[2..] {
            assert_eq!(rule.style.len(), 1);
            assert!(rule.style.contains_key("background-color"));
        }
    }

    #[test]
    fn test_positional_pairing() {
        let ls = labels(&["A", "B", "C", "D"]);
        let palette = random_color_palette(ls.len(), 11);
        let sheet = build_stylesheet(node_centered(), edge_directed(), &ls, 11).unwrap();
        for (i, label) in ls.iter().enumerate() {
            let rule = &sheet[2 + i];
            assert_eq!(rule.selector, format!("node[label = \"{label}\"]"));
            assert_eq!(
                rule.style["background-color"],
                StyleValue::Str(palette[i].clone())
            );
        }
    }

    #[test]
    fn test_zero_labels_yields_base_rules_only() {
        let sheet = build_stylesheet(node_centered(), edge_directed(), &[], DEFAULT_SEED).unwrap();
        assert_eq!(sheet, vec![node_centered(), edge_directed()]);
    }

    #[test]
    fn test_same_size_label_sets_get_same_colors() {
        // Assignment is positional: two different label sets of equal
        // size and the same seed share the color sequence.
        let a = build_stylesheet(node_centered(), edge_directed(), &labels(&["X", "Y"]), 6)
            .unwrap();
        let b = build_stylesheet(node_centered(), edge_directed(), &labels(&["P", "Q"]), 6)
            .unwrap();
        assert_eq!(a[2].style["background-color"], b[2].style["background-color"]);
        assert_eq!(a[3].style["background-color"], b[3].style["background-color"]);
    }

    #[test]
    fn test_length_mismatch_is_invalid_argument() {
        let err = label_overrides(&labels(&["A", "B"]), &["#AABBCC".to_string()]).unwrap_err();
        assert!(matches!(err, StyleError::InvalidArgument(_)));
    }

    #[test]
    fn test_rule_serialization_shape() {
        let rule = node_centered();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["selector"], "node");
        assert_eq!(json["style"]["label"], "data(name)");
        assert_eq!(json["style"]["background-opacity"], 0.6);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let json = serde_json::to_string(&edge_directed()).unwrap();
        let line = json.find("line-color").unwrap();
        let shape = json.find("target-arrow-shape").unwrap();
        let curve = json.find("curve-style").unwrap();
        assert!(line < shape && shape < curve);
    }

    #[test]
    fn test_edge_rule_variants() {
        assert!(edge_directed().style.contains_key("target-arrow-shape"));
        assert!(edge_directed_named().style.contains_key("label"));
        assert!(!edge_undirected().style.contains_key("target-arrow-shape"));
    }
}
