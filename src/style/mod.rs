mod palette;
mod rules;

pub use palette::{DEFAULT_SEED, random_color_palette};
pub use rules::{
    StyleError, StyleRule, StyleValue, build_stylesheet, edge_directed, edge_directed_named,
    edge_undirected, node_centered,
};
