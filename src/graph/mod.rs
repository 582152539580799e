//! Program graph: an arena of programs plus producer -> consumer edges.
//!
//! Programs live in a `Vec` sorted by id, so a `ProgramId` is both an arena
//! index and a canonical ordering. Edges are stored as id pairs; a consumer
//! shared by several producers is one arena slot, and every producer sees its
//! current `outputs`.
//!
//! The edge set has two layers:
//! - candidates: every pair the matcher accepts (both directions of a mutual
//!   pair included). Propagation runs over these.
//! - resolved edges: candidates after the mutual-pair tie-break, with labels.
//!   This is what renderers and traversals see.

pub mod edges;
pub mod error;
pub mod matcher;
pub mod project;
pub mod propagate;

pub use edges::Edge;
pub use error::{GraphError, PropagationError};
pub use project::{project, Projected, Projection, Subgraph, ROOT_ID};
pub use propagate::{Convergence, PassReport, Propagator};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A set of parameter names.
pub type ParamSet = BTreeSet<String>;

/// Candidate adjacency: producer -> consumers.
pub type Adjacency = BTreeMap<ProgramId, BTreeSet<ProgramId>>;

/// Index of a program in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramId(pub usize);

/// Descriptor fields the graph carries but never interprets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub commands: Vec<String>,
    pub comments: Vec<String>,
    pub filter: Option<String>,
    pub regex: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: String,
    /// Alternative input bundles; any one of them makes the program invokable.
    pub requirement_sets: Vec<ParamSet>,
    /// Outputs as written in the descriptor.
    pub declared_outputs: ParamSet,
    /// Declared plus inherited outputs. Only grows.
    pub outputs: ParamSet,
    pub metadata: Metadata,
}

impl Program {
    pub fn new(id: impl Into<String>, requirement_sets: Vec<ParamSet>, outputs: ParamSet) -> Self {
        Self {
            id: id.into(),
            requirement_sets,
            declared_outputs: outputs.clone(),
            outputs,
            metadata: Metadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Declares no bundles, so no producer ever feeds it.
    pub fn is_root(&self) -> bool {
        self.requirement_sets.is_empty()
    }

    /// Outputs gained through propagation.
    pub fn inherited_outputs(&self) -> ParamSet {
        self.outputs.difference(&self.declared_outputs).cloned().collect()
    }
}

#[derive(Debug, Clone)]
pub struct Graph {
    programs: Vec<Program>,
    index: BTreeMap<String, ProgramId>,
    candidates: Adjacency,
    universe: ParamSet,
}

impl Graph {
    /// Build the arena and the initial candidate edges. Outputs are not yet
    /// propagated; see [`Graph::converge`].
    pub fn new(mut programs: Vec<Program>) -> Result<Self, GraphError> {
        programs.sort_by(|a, b| a.id.cmp(&b.id));

        let mut index = BTreeMap::new();
        let mut universe = ParamSet::new();
        for (i, p) in programs.iter().enumerate() {
            if p.id.trim().is_empty() {
                return Err(GraphError::EmptyProgramId);
            }
            if index.insert(p.id.clone(), ProgramId(i)).is_some() {
                return Err(GraphError::DuplicateProgram { id: p.id.clone() });
            }
            universe.extend(p.outputs.iter().cloned());
            for bundle in &p.requirement_sets {
                universe.extend(bundle.iter().cloned());
            }
        }

        let candidates = edges::build_all(&programs);
        Ok(Self {
            programs,
            index,
            candidates,
            universe,
        })
    }

    /// Build, then propagate outputs to the fixed point.
    pub fn resolve(programs: Vec<Program>) -> Result<(Self, Convergence), GraphError> {
        let mut graph = Self::new(programs)?;
        let convergence = graph.converge()?;
        Ok((graph, convergence))
    }

    /// Run the output propagator until no program's outputs change.
    pub fn converge(&mut self) -> Result<Convergence, GraphError> {
        Ok(Propagator::new(self).run()?)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<ProgramId> {
        self.index.get(id).copied()
    }

    /// # Panics
    ///
    /// If `id` was not issued by this graph.
    pub fn program(&self, id: ProgramId) -> &Program {
        &self.programs[id.0]
    }

    pub fn programs(&self) -> impl Iterator<Item = (ProgramId, &Program)> {
        self.programs.iter().enumerate().map(|(i, p)| (ProgramId(i), p))
    }

    /// Every parameter name declared as an input or output.
    pub fn universe(&self) -> &ParamSet {
        &self.universe
    }

    pub fn candidates(&self) -> &Adjacency {
        &self.candidates
    }

    /// Candidate pairs as (producer, consumer), in id order.
    pub fn candidate_pairs(&self) -> Vec<(ProgramId, ProgramId)> {
        self.candidates
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (*from, *to)))
            .collect()
    }

    /// Requirement-free programs.
    pub fn roots(&self) -> BTreeSet<ProgramId> {
        edges::roots(&self.programs)
    }

    /// Resolved edges: candidates after the mutual-pair tie-break, ranked by
    /// distance from the requirement-free programs.
    pub fn edges(&self) -> Vec<Edge> {
        self.edges_ranked_from(&self.roots())
    }

    /// Resolved edges with the tie-break ranked by distance from `sources`.
    pub fn edges_ranked_from(&self, sources: &BTreeSet<ProgramId>) -> Vec<Edge> {
        edges::resolve(&self.programs, &self.candidates, sources)
    }

    /// The whole graph as a subgraph.
    pub fn whole(&self) -> Subgraph {
        Subgraph {
            root: None,
            nodes: (0..self.programs.len()).map(ProgramId).collect(),
            edges: self.edges(),
        }
    }

    /// One program plus its direct consumers.
    pub fn focus(&self, id: &str) -> Result<Subgraph, GraphError> {
        let pid = self.get(id).ok_or_else(|| GraphError::UnknownProgram { id: id.to_string() })?;
        let edges: Vec<Edge> = self.edges().into_iter().filter(|e| e.from == pid).collect();
        let mut nodes = BTreeSet::from([pid]);
        nodes.extend(edges.iter().map(|e| e.to));
        Ok(Subgraph {
            root: None,
            nodes,
            edges,
        })
    }

    /// Merge `from`'s outputs into `to`'s. Returns the parameters added.
    fn merge_outputs(&mut self, from: ProgramId, to: ProgramId) -> Vec<String> {
        let incoming = self.programs[from.0].outputs.clone();
        let target = &mut self.programs[to.0].outputs;
        incoming
            .into_iter()
            .filter(|param| target.insert(param.clone()))
            .collect()
    }
}

/// Shorthand for building parameter sets in tests.
#[cfg(test)]
pub(crate) fn params(names: &[&str]) -> ParamSet {
    names.iter().map(|s| s.to_string()).collect()
}
