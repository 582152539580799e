//! Spec layer: descriptor JSON schema, validation, and directory loading.
//!
//! This module is separate from the graph engine and from rendering. It
//! produces validated `Program`s and nothing else.

pub mod load;
pub mod program;

pub use load::{load_descriptor, load_templates};
pub use program::ProgramSpec;
