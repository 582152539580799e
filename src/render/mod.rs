//! Renderers for the graph view model.

pub mod dot;
pub mod html;

use crate::model::GraphView;
use clap::ValueEnum;

pub use dot::render_dot;
pub use html::render_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Graphviz DOT (`dot -Tsvg graph.dot`)
    Dot,
    /// Self-contained HTML page
    Html,
    /// The view model as pretty JSON
    Json,
}

pub fn render(view: &GraphView, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Dot => render_dot(view),
        Format::Html => render_html(view),
        Format::Json => Ok(serde_json::to_string_pretty(view)? + "\n"),
    }
}
