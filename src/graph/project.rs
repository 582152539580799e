//! Root projection: restrict the graph to what a seed parameter set reaches.

use super::error::GraphError;
use super::{Convergence, Edge, Graph, ParamSet, Program, ProgramId};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Id of the virtual producer that stands for the seed.
pub const ROOT_ID: &str = "input";

/// A node subset of a graph plus the resolved edges among it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph {
    /// Virtual root, when the subgraph came from a projection.
    pub root: Option<ProgramId>,
    pub nodes: BTreeSet<ProgramId>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Root plus every program reachable from it.
    Reachable(Subgraph),
    /// The seed feeds no program. A normal outcome.
    NoApplicablePrograms,
}

/// Converged graph (virtual root included) and the projection over it.
#[derive(Debug, Clone)]
pub struct Projected {
    pub graph: Graph,
    pub convergence: Convergence,
    pub projection: Projection,
}

/// Insert a virtual producer with `outputs = seed`, converge, and keep only
/// the programs reachable from it.
pub fn project(mut programs: Vec<Program>, seed: &ParamSet) -> Result<Projected, GraphError> {
    if let Some(p) = programs.iter().find(|p| p.id == ROOT_ID) {
        return Err(GraphError::ReservedId { id: p.id.clone() });
    }
    programs.push(Program::new(ROOT_ID, vec![], seed.clone()));

    let (graph, convergence) = Graph::resolve(programs)?;
    let root = graph
        .get(ROOT_ID)
        .ok_or_else(|| GraphError::UnknownProgram { id: ROOT_ID.to_string() })?;

    let edges = graph.edges_ranked_from(&BTreeSet::from([root]));
    let reached = reachable(root, &edges);
    if reached.len() <= 1 {
        warn!(seed = ?seed, "no applicable programs for seed");
        return Ok(Projected {
            graph,
            convergence,
            projection: Projection::NoApplicablePrograms,
        });
    }
    info!(seed = ?seed, reachable = reached.len() - 1, "projected graph");

    let edges = edges
        .into_iter()
        .filter(|e| reached.contains(&e.from) && reached.contains(&e.to))
        .collect();
    Ok(Projected {
        graph,
        convergence,
        projection: Projection::Reachable(Subgraph {
            root: Some(root),
            nodes: reached,
            edges,
        }),
    })
}

/// Depth-first walk over every child. `from` is part of the result.
pub fn reachable(from: ProgramId, edges: &[Edge]) -> BTreeSet<ProgramId> {
    let mut visited = BTreeSet::from([from]);
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
        for edge in edges.iter().filter(|e| e.from == id) {
            if visited.insert(edge.to) {
                stack.push(edge.to);
            }
        }
    }
    visited
}
