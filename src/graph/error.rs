//! Error types for graph construction and propagation.

use thiserror::Error;

/// Internal-consistency failures of the output propagator.
///
/// None of these are reachable through valid input: they mean the
/// monotone-union loop is broken. Processing halts when one is raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropagationError {
    /// More output growth events than `programs * universe` were recorded.
    #[error(
        "output growth bound exceeded: {events} growth events for {programs} programs over {universe} parameters (bound {bound})"
    )]
    GrowthBoundExceeded {
        events: usize,
        bound: usize,
        programs: usize,
        universe: usize,
    },

    /// A pass was requested after the pass bound was used up.
    #[error("pass bound exceeded: pass {pass} requested, bound is {bound}")]
    PassBoundExceeded { pass: usize, bound: usize },

    /// A merge introduced a parameter nobody declared.
    #[error("program '{program}' gained parameter '{param}' outside the parameter universe")]
    ParameterOutsideUniverse { program: String, param: String },

    /// A program was found among its own consumers.
    #[error("self-edge on program '{program}' in the candidate edge set")]
    SelfEdge { program: String },
}

/// Errors produced while building or querying a program graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate program id: '{id}'")]
    DuplicateProgram { id: String },

    #[error("empty program id")]
    EmptyProgramId,

    #[error("unknown program: '{id}'")]
    UnknownProgram { id: String },

    /// A descriptor uses the id reserved for the projection root.
    #[error("program id '{id}' is reserved for the projection root")]
    ReservedId { id: String },

    #[error("internal consistency violation: {0}")]
    Propagation(#[from] PropagationError),
}
