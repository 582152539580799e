//! Edge building and the mutual-pair tie-break.

use super::matcher::{feed_label, feeds};
use super::{Adjacency, ParamSet, Program, ProgramId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A resolved producer -> consumer edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    pub from: ProgramId,
    pub to: ProgramId,
    /// Producer outputs that satisfied the consumer's bundles.
    pub label: ParamSet,
}

/// Scan every ordered pair and collect candidate edges.
pub fn build_all(programs: &[Program]) -> Adjacency {
    let mut adjacency = Adjacency::new();
    for i in 0..programs.len() {
        let consumers = edges_from(programs, ProgramId(i));
        if !consumers.is_empty() {
            adjacency.insert(ProgramId(i), consumers);
        }
    }
    adjacency
}

/// Consumers the producer's current outputs can feed. Never includes the producer.
pub fn edges_from(programs: &[Program], producer: ProgramId) -> BTreeSet<ProgramId> {
    let outputs = &programs[producer.0].outputs;
    programs
        .iter()
        .enumerate()
        .filter(|(i, consumer)| *i != producer.0 && feeds(outputs, consumer))
        .map(|(i, _)| ProgramId(i))
        .collect()
}

/// Requirement-free programs: the default sources for ranking edges.
pub fn roots(programs: &[Program]) -> BTreeSet<ProgramId> {
    programs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_root())
        .map(|(i, _)| ProgramId(i))
        .collect()
}

/// Hop distance from the nearest of `sources` over candidate edges.
pub fn distances(candidates: &Adjacency, sources: &BTreeSet<ProgramId>) -> BTreeMap<ProgramId, usize> {
    let mut dist: BTreeMap<ProgramId, usize> = sources.iter().map(|s| (*s, 0)).collect();
    let mut queue: VecDeque<ProgramId> = sources.iter().copied().collect();
    while let Some(id) = queue.pop_front() {
        let d = dist[&id];
        for next in candidates.get(&id).into_iter().flatten() {
            if !dist.contains_key(next) {
                dist.insert(*next, d + 1);
                queue.push_back(*next);
            }
        }
    }
    dist
}

/// Apply the mutual-pair tie-break and label the surviving candidates.
///
/// When both `a -> b` and `b -> a` are candidates, only one survives: the one
/// whose producer is closer to `sources`. Equal or missing distances fall
/// back to the lexicographically smaller producer id. Every program reachable
/// from `sources` over candidates stays reachable over the result.
pub fn resolve(programs: &[Program], candidates: &Adjacency, sources: &BTreeSet<ProgramId>) -> Vec<Edge> {
    let dist = distances(candidates, sources);
    let is_candidate = |from: ProgramId, to: ProgramId| {
        candidates.get(&from).is_some_and(|tos| tos.contains(&to))
    };

    let mut edges = Vec::new();
    for (from, tos) in candidates {
        for to in tos {
            if is_candidate(*to, *from) && !keeps_direction(programs, &dist, *from, *to) {
                continue;
            }
            edges.push(Edge {
                from: *from,
                to: *to,
                label: feed_label(&programs[from.0].outputs, &programs[to.0]),
            });
        }
    }
    edges
}

fn keeps_direction(
    programs: &[Program],
    dist: &BTreeMap<ProgramId, usize>,
    from: ProgramId,
    to: ProgramId,
) -> bool {
    match (dist.get(&from), dist.get(&to)) {
        (Some(a), Some(b)) if a != b => a < b,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        _ => programs[from.0].id < programs[to.0].id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{params, Graph};
    use pretty_assertions::assert_eq;

    fn names(graph: &Graph, edges: &[Edge]) -> Vec<(String, String)> {
        edges
            .iter()
            .map(|e| (graph.program(e.from).id.clone(), graph.program(e.to).id.clone()))
            .collect()
    }

    #[test]
    fn build_all_skips_self_and_roots() {
        let programs = vec![
            Program::new("echo", vec![params(&["ip"])], params(&["ip"])),
            Program::new("root", vec![], params(&["ip"])),
        ];
        let adjacency = build_all(&programs);
        // echo feeds neither itself nor the requirement-free root.
        assert_eq!(adjacency.get(&ProgramId(0)), None);
        assert_eq!(adjacency[&ProgramId(1)], BTreeSet::from([ProgramId(0)]));
    }

    #[test]
    fn empty_bundle_consumer_is_fed_with_an_empty_label() {
        let programs = vec![
            Program::new("a", vec![], params(&["ip"])),
            Program::new("e", vec![params(&[])], params(&[])),
        ];
        let (graph, _) = Graph::resolve(programs).unwrap();
        let edges = graph.edges();
        assert_eq!(names(&graph, &edges), vec![("a".to_string(), "e".to_string())]);
        assert_eq!(edges[0].label, params(&[]));
    }

    #[test]
    fn edges_from_uses_current_outputs() {
        let mut programs = vec![
            Program::new("a", vec![], params(&["ip"])),
            Program::new("b", vec![params(&["domain"])], params(&[])),
        ];
        assert!(edges_from(&programs, ProgramId(0)).is_empty());
        programs[0].outputs.insert("domain".into());
        assert_eq!(edges_from(&programs, ProgramId(0)), BTreeSet::from([ProgramId(1)]));
    }

    #[test]
    fn mutual_pair_without_roots_keeps_smaller_id() {
        let programs = vec![
            Program::new("B", vec![params(&["x"])], params(&["y"])),
            Program::new("A", vec![params(&["y"])], params(&["x"])),
        ];
        let graph = Graph::new(programs).unwrap();
        assert_eq!(graph.candidate_pairs().len(), 2);
        assert_eq!(names(&graph, &graph.edges()), vec![("A".to_string(), "B".to_string())]);
    }

    #[test]
    fn mutual_pair_keeps_direction_away_from_root() {
        // `a` sorts first but sits further from the root than `b`.
        let programs = vec![
            Program::new("seed", vec![], params(&["x"])),
            Program::new("b", vec![params(&["x"])], params(&["y"])),
            Program::new("a", vec![params(&["y"])], params(&["x"])),
        ];
        let (graph, _) = Graph::resolve(programs).unwrap();
        let pairs = names(&graph, &graph.edges());
        assert!(pairs.contains(&("b".to_string(), "a".to_string())));
        assert!(!pairs.contains(&("a".to_string(), "b".to_string())));
    }

    #[test]
    fn distances_follow_candidates() {
        let programs = vec![
            Program::new("a", vec![], params(&["ip"])),
            Program::new("b", vec![params(&["ip"])], params(&["domain"])),
            Program::new("c", vec![params(&["domain"])], params(&[])),
            Program::new("island", vec![params(&["nothing"])], params(&[])),
        ];
        let adjacency = build_all(&programs);
        let dist = distances(&adjacency, &roots(&programs));
        assert_eq!(
            dist,
            BTreeMap::from([(ProgramId(0), 0), (ProgramId(1), 1), (ProgramId(2), 2)])
        );
    }
}
