//! Program chaining: which tools can feed their results into which others.
//!
//! - `spec`: descriptor JSON loading and validation
//! - `graph`: requirement matching, edge building, output propagation to a
//!   fixed point, root projection
//! - `model`: serializable view of a converged graph
//! - `render`: DOT / HTML / JSON output

pub mod graph;
pub mod model;
pub mod render;
pub mod spec;

pub type Result<T> = anyhow::Result<T>;
