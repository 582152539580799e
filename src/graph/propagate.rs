//! Output propagation to a fixed point.
//!
//! Semi-naive evaluation: the first pass pushes every program's outputs into
//! its candidate consumers; each later pass only processes the programs whose
//! outputs grew in the pass before, and only their edges are rescanned.
//!
//! Union is monotone and the parameter universe is finite, so each program
//! grows at most `universe` times. Both the growth events and the passes are
//! counted against that bound.

use super::error::PropagationError;
use super::{edges, Graph, ProgramId};
use std::collections::BTreeSet;
use tracing::{debug, error, info};

/// Outcome of a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// 1-based pass number; 0 when no pass ran.
    pub pass: usize,
    /// Producers processed in this pass.
    pub processed: usize,
    /// Programs whose outputs grew.
    pub changed: BTreeSet<ProgramId>,
    /// Parameters added across all programs.
    pub growth: usize,
}

/// Summary of a completed propagation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Convergence {
    pub passes: usize,
    pub growth_events: usize,
    pub candidate_edges: usize,
}

pub struct Propagator<'g> {
    graph: &'g mut Graph,
    dirty: BTreeSet<ProgramId>,
    passes: usize,
    growth: usize,
    growth_bound: usize,
    pass_bound: usize,
}

impl<'g> Propagator<'g> {
    pub fn new(graph: &'g mut Graph) -> Self {
        let growth_bound = graph.len() * graph.universe().len();
        let dirty = (0..graph.len()).map(ProgramId).collect();
        Self {
            graph,
            dirty,
            passes: 0,
            growth: 0,
            growth_bound,
            pass_bound: growth_bound + 1,
        }
    }

    pub fn is_converged(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn graph(&self) -> &Graph {
        &*self.graph
    }

    /// Run one pass over the dirty frontier.
    ///
    /// Between two calls the graph is consistent: every candidate edge is
    /// valid for the current outputs. A converged propagator returns an empty
    /// report.
    pub fn step(&mut self) -> Result<PassReport, PropagationError> {
        let frontier = std::mem::take(&mut self.dirty);
        if frontier.is_empty() {
            return Ok(PassReport {
                pass: 0,
                processed: 0,
                changed: BTreeSet::new(),
                growth: 0,
            });
        }
        if self.passes >= self.pass_bound {
            let err = PropagationError::PassBoundExceeded {
                pass: self.passes + 1,
                bound: self.pass_bound,
            };
            error!("{}", err);
            return Err(err);
        }
        self.passes += 1;

        let mut changed = BTreeSet::new();
        let mut growth = 0;
        for producer in &frontier {
            let consumers: Vec<ProgramId> = self
                .graph
                .candidates
                .get(producer)
                .map(|c| c.iter().copied().collect())
                .unwrap_or_default();

            for consumer in consumers {
                if consumer == *producer {
                    let err = PropagationError::SelfEdge {
                        program: self.graph.program(consumer).id.clone(),
                    };
                    error!("{}", err);
                    return Err(err);
                }
                let added = self.graph.merge_outputs(*producer, consumer);
                if added.is_empty() {
                    continue;
                }
                self.check_growth(consumer, &added)?;
                growth += added.len();
                changed.insert(consumer);
            }
        }

        // Grown programs may now feed consumers they could not feed before.
        for id in &changed {
            let consumers = edges::edges_from(&self.graph.programs, *id);
            if !consumers.is_empty() {
                self.graph.candidates.entry(*id).or_default().extend(consumers);
            }
        }

        debug!(
            pass = self.passes,
            processed = frontier.len(),
            changed = changed.len(),
            growth,
            "propagation pass"
        );

        self.dirty = changed.clone();
        Ok(PassReport {
            pass: self.passes,
            processed: frontier.len(),
            changed,
            growth,
        })
    }

    /// Step until no program changes.
    pub fn run(mut self) -> Result<Convergence, PropagationError> {
        while !self.is_converged() {
            self.step()?;
        }
        let convergence = Convergence {
            passes: self.passes,
            growth_events: self.growth,
            candidate_edges: self.graph.candidate_pairs().len(),
        };
        info!(
            programs = self.graph.len(),
            passes = convergence.passes,
            growth = convergence.growth_events,
            edges = convergence.candidate_edges,
            "propagation converged"
        );
        Ok(convergence)
    }

    fn check_growth(&mut self, consumer: ProgramId, added: &[String]) -> Result<(), PropagationError> {
        if let Some(param) = added.iter().find(|p| !self.graph.universe.contains(*p)) {
            let err = PropagationError::ParameterOutsideUniverse {
                program: self.graph.program(consumer).id.clone(),
                param: param.clone(),
            };
            error!("{}", err);
            return Err(err);
        }
        self.growth += added.len();
        if self.growth > self.growth_bound {
            let err = PropagationError::GrowthBoundExceeded {
                events: self.growth,
                bound: self.growth_bound,
                programs: self.graph.len(),
                universe: self.graph.universe.len(),
            };
            error!("{}", err);
            return Err(err);
        }
        Ok(())
    }
}
