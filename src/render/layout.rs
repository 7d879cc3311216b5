use anyhow::{Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named graph-drawing algorithm plus its options.
///
/// Options are passed through to the layout engine untouched; nothing here
/// interprets them. Serializes to the Cytoscape layout object
/// `{"name": ..., ...options}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    #[serde(flatten)]
    pub options: IndexMap<String, Value>,
}

impl Layout {
    /// A layout with the default `padding: 0` the widget always sets.
    pub fn new(name: impl Into<String>) -> Self {
        let mut options = IndexMap::new();
        options.insert("padding".to_string(), Value::from(0));
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Parse a `key=value` layout option from the command line. Values that
/// read as numbers or booleans are typed as such, everything else stays a
/// string (`nodeSpacing=65`, `nodeDimensionsIncludeLabels=true`).
pub fn parse_layout_option(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Invalid layout option '{raw}', expected key=value");
    };
    if key.is_empty() {
        bail!("Invalid layout option '{raw}', expected key=value");
    }

    let value = if let Ok(b) = value.parse::<bool>() {
        Value::Bool(b)
    } else if let Ok(i) = value.parse::<i64>() {
        Value::from(i)
    } else if let Ok(f) = value.parse::<f64>() {
        Value::from(f)
    } else {
        Value::String(value.to_string())
    };

    Ok((key.to_string(), value))
}
