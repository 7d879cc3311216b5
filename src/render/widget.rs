use anyhow::Result;
use serde_json::{Value, json};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::layout::Layout;
use crate::graph::subgraph::Subgraph;
use crate::style::StyleRule;

/// Generate a self-contained HTML page rendering the subgraph with
/// Cytoscape. The stylesheet, layout, and tooltip field are embedded as
/// JSON and handed to the widget untouched.
pub fn render_page(
    subgraph: &Subgraph,
    stylesheet: &[StyleRule],
    layout: &Layout,
    tooltip_source: &str,
) -> Result<String> {
    let elements = to_elements(subgraph);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>graphscape</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #fafafc; color: #2a2a3a; height: 100vh; display: flex; flex-direction: column; overflow: hidden; }}
        #header {{ padding: 10px 20px; background: #ffffff; border-bottom: 1px solid #e4e4ee; display: flex; align-items: center; gap: 16px; flex-shrink: 0; }}
        #header h1 {{ font-size: 1em; font-weight: 700; letter-spacing: -0.3px; }}
        #stats {{ margin-left: auto; display: flex; gap: 12px; font-size: 0.8em; color: #777790; }}
        .stat b {{ color: #4a4ad0; }}
        #cy {{ flex: 1; }}
        #tooltip {{ display: none; position: fixed; max-width: 360px; background: #1d1d2e; color: #e8e8f4; border-radius: 8px; padding: 10px 14px; font-size: 0.8em; white-space: pre-line; z-index: 1000; pointer-events: none; box-shadow: 0 8px 20px rgba(0,0,0,0.3); }}
        #error {{ display: none; position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #b04050; }}
    </style>
</head>
<body>
    <div id="header">
        <h1>graphscape</h1>
        <div id="stats">
            <span class="stat"><b>{node_count}</b> nodes</span>
            <span class="stat"><b>{edge_count}</b> edges</span>
        </div>
    </div>
    <div id="cy"></div>
    <div id="tooltip"></div>
    <div id="error">Failed to load Cytoscape. Check your connection.</div>

    <script>
        // Cytoscape core plus the layout extensions the canned layouts need.
        // Each entry lists CDN fallbacks.
        const SCRIPTS = [
            ['https://cdnjs.cloudflare.com/ajax/libs/cytoscape/3.30.2/cytoscape.min.js',
             'https://unpkg.com/cytoscape@3.30.2/dist/cytoscape.min.js'],
            ['https://cdnjs.cloudflare.com/ajax/libs/dagre/0.8.5/dagre.min.js',
             'https://unpkg.com/dagre@0.8.5/dist/dagre.min.js'],
            ['https://unpkg.com/cytoscape-dagre@2.5.0/cytoscape-dagre.js'],
            ['https://unpkg.com/klayjs@0.4.1/klay.js'],
            ['https://unpkg.com/cytoscape-klay@3.1.4/cytoscape-klay.js'],
            ['https://unpkg.com/webcola@3.4.0/WebCola/cola.min.js'],
            ['https://unpkg.com/cytoscape-cola@2.5.1/cytoscape-cola.js']
        ];

        function loadOne(urls, idx, done) {{
            if (idx >= urls.length) {{ done(false); return; }}
            const s = document.createElement('script');
            s.src = urls[idx];
            s.onload = () => done(true);
            s.onerror = () => loadOne(urls, idx + 1, done);
            document.head.appendChild(s);
        }}

        function loadAll(i) {{
            if (i >= SCRIPTS.length) {{ initWidget(); return; }}
            loadOne(SCRIPTS[i], 0, (ok) => {{
                // The core is mandatory, extensions are best-effort.
                if (!ok && i === 0) {{
                    document.getElementById('error').style.display = 'block';
                    return;
                }}
                loadAll(i + 1);
            }});
        }}
        loadAll(0);

        // Data injected by Rust
        const elements = {elements};
        const styleSheet = {stylesheet};
        const layoutConfig = {layout};
        const tooltipSource = {tooltip_source};

        function initWidget() {{
            const cy = cytoscape({{
                container: document.getElementById('cy'),
                elements: elements,
                style: styleSheet,
                layout: layoutConfig
            }});

            const tooltip = document.getElementById('tooltip');
            cy.on('tap', 'node', (evt) => {{
                const text = evt.target.data(tooltipSource);
                if (!text) return;
                tooltip.textContent = text;
                tooltip.style.display = 'block';
                const pos = evt.renderedPosition;
                tooltip.style.left = (pos.x + 20) + 'px';
                tooltip.style.top = (pos.y + 60) + 'px';
            }});
            cy.on('tap', (evt) => {{
                if (evt.target === cy) tooltip.style.display = 'none';
            }});
        }}
    </script>
</body>
</html>"#,
        node_count = subgraph.node_count(),
        edge_count = subgraph.edge_count(),
        elements = serde_json::to_string(&elements)?,
        stylesheet = serde_json::to_string(stylesheet)?,
        layout = serde_json::to_string(layout)?,
        tooltip_source = serde_json::to_string(tooltip_source)?,
    );

    Ok(html)
}

/// Convert a subgraph to Cytoscape element JSON. Each node's data carries
/// its scalar properties plus `id`, `label` (primary label), `name` (label
/// text source), and `tooltip` (all properties as key: value lines).
fn to_elements(subgraph: &Subgraph) -> Vec<Value> {
    let mut elements = Vec::with_capacity(subgraph.node_count() + subgraph.edge_count());

    for node in subgraph.nodes() {
        let mut data = serde_json::Map::new();
        for (key, value) in &node.properties {
            data.insert(key.clone(), value.clone());
        }
        if !data.contains_key("name") {
            let fallback = node.primary_label().unwrap_or_default().to_string();
            data.insert("name".to_string(), Value::String(fallback));
        }
        data.insert("id".to_string(), Value::String(format!("n{}", node.id)));
        data.insert(
            "label".to_string(),
            Value::String(node.primary_label().unwrap_or_default().to_string()),
        );
        data.insert("tooltip".to_string(), Value::String(node.tooltip_text()));
        elements.push(json!({ "data": data }));
    }

    for edge in subgraph.edges() {
        let mut data = serde_json::Map::new();
        for (key, value) in &edge.properties {
            data.insert(key.clone(), value.clone());
        }
        data.insert("id".to_string(), Value::String(format!("e{}", edge.id)));
        data.insert(
            "source".to_string(),
            Value::String(format!("n{}", edge.source)),
        );
        data.insert(
            "target".to_string(),
            Value::String(format!("n{}", edge.target)),
        );
        data.insert("name".to_string(), Value::String(edge.rel_type.clone()));
        elements.push(json!({ "data": data }));
    }

    elements
}

/// Write the page to disk (the system temp dir unless a path is given) and
/// optionally open it in the default browser.
pub fn write_and_open(html: &str, output: Option<&Path>, open: bool) -> Result<PathBuf> {
    let html_path = match output {
        Some(path) => path.to_path_buf(),
        None => std::env::temp_dir().join("graphscape_viz.html"),
    };

    let mut file = std::fs::File::create(&html_path)?;
    file.write_all(html.as_bytes())?;

    if open {
        open_in_browser(&html_path);
    }

    Ok(html_path)
}

fn open_in_browser(html_path: &Path) {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(html_path)
            .spawn()
            .ok();
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(html_path)
            .spawn()
            .ok();
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", html_path.to_str().unwrap_or("")])
            .spawn()
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::subgraph::{SubgraphEdge, SubgraphNode};
    use crate::style::{DEFAULT_SEED, build_stylesheet, edge_directed, node_centered};
    use indexmap::IndexMap;

    fn sample_subgraph() -> Subgraph {
        let mut sg = Subgraph::new();
        let mut props = IndexMap::new();
        props.insert("name".to_string(), Value::String("Skopje".to_string()));
        sg.add_node(SubgraphNode {
            id: 1,
            labels: vec!["City".to_string()],
            properties: props,
        });
        sg.add_node(SubgraphNode {
            id: 2,
            labels: vec!["Country".to_string()],
            properties: IndexMap::new(),
        });
        sg.add_edge(SubgraphEdge {
            id: 10,
            source: 1,
            target: 2,
            rel_type: "IN".to_string(),
            properties: IndexMap::new(),
        });
        sg
    }

    #[test]
    fn test_elements_shape() {
        let elements = to_elements(&sample_subgraph());
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0]["data"]["id"], "n1");
        assert_eq!(elements[0]["data"]["label"], "City");
        assert_eq!(elements[0]["data"]["name"], "Skopje");
        assert_eq!(elements[2]["data"]["source"], "n1");
        assert_eq!(elements[2]["data"]["target"], "n2");
        assert_eq!(elements[2]["data"]["name"], "IN");
    }

    #[test]
    fn test_node_name_falls_back_to_label() {
        let elements = to_elements(&sample_subgraph());
        assert_eq!(elements[1]["data"]["name"], "Country");
    }

    #[test]
    fn test_node_tooltip_present() {
        let elements = to_elements(&sample_subgraph());
        assert_eq!(elements[0]["data"]["tooltip"], "name: Skopje");
    }

    #[test]
    fn test_render_page_embeds_everything() {
        let sg = sample_subgraph();
        let sheet = build_stylesheet(
            node_centered(),
            edge_directed(),
            &["City".to_string(), "Country".to_string()],
            DEFAULT_SEED,
        )
        .unwrap();
        let layout = Layout::new("dagre");
        let html = render_page(&sg, &sheet, &layout, "tooltip").unwrap();

        assert!(html.contains(r#""name":"dagre""#));
        assert!(html.contains(r#"node[label = \"City\"]"#));
        assert!(html.contains("Skopje"));
        assert!(html.contains(r#"const tooltipSource = "tooltip""#));
    }

    #[test]
    fn test_render_empty_subgraph() {
        let sheet =
            build_stylesheet(node_centered(), edge_directed(), &[], DEFAULT_SEED).unwrap();
        let html = render_page(&Subgraph::new(), &sheet, &Layout::new("concentric"), "tooltip")
            .unwrap();
        assert!(html.contains("const elements = []"));
    }

    #[test]
    fn test_write_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let written = write_and_open("<html></html>", Some(&path), false).unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
