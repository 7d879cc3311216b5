mod layout;
mod widget;

pub use layout::{Layout, parse_layout_option};
pub use widget::{render_page, write_and_open};
