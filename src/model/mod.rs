//! View model: a converged graph (or a slice of it) flattened for renderers.

use crate::graph::{Convergence, Graph, ParamSet, ProgramId, Subgraph};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: String,
    pub requirement_sets: Vec<Vec<String>>,
    pub declared_outputs: Vec<String>,
    /// Outputs gained from producers during propagation.
    pub inherited_outputs: Vec<String>,
    pub outputs: Vec<String>,
    pub commands: Vec<String>,
    pub comments: Vec<String>,
    pub filter: Option<String>,
    pub regex: BTreeMap<String, String>,
    /// Consumers within the view, sorted.
    pub children: Vec<String>,
    /// Producers within the view, sorted.
    pub parents: Vec<String>,
    /// True for the synthesized seed producer.
    pub virtual_root: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub from: String,
    pub to: String,
    pub label: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootView {
    pub id: String,
    pub seed: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    /// Programs in the view, virtual root excluded.
    pub programs: usize,
    pub edges: usize,
    pub parameters: usize,
    pub passes: usize,
    pub growth_events: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub root: Option<RootView>,
    pub nodes: BTreeMap<String, NodeView>,
    pub edges: Vec<EdgeView>,
    pub totals: TotalsView,
}

fn sorted(set: &ParamSet) -> Vec<String> {
    set.iter().cloned().collect()
}

/// Build the view of `subgraph` over `graph`.
pub fn build_graph_view(graph: &Graph, subgraph: &Subgraph, convergence: &Convergence) -> GraphView {
    let name = |id: ProgramId| graph.program(id).id.clone();

    let edges: Vec<EdgeView> = subgraph
        .edges
        .iter()
        .map(|e| EdgeView {
            from: name(e.from),
            to: name(e.to),
            label: sorted(&e.label),
        })
        .collect();

    let mut children: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut parents: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for e in &edges {
        children.entry(e.from.as_str()).or_default().push(e.to.clone());
        parents.entry(e.to.as_str()).or_default().push(e.from.clone());
    }

    let mut nodes = BTreeMap::new();
    for id in &subgraph.nodes {
        let p = graph.program(*id);
        let mut kids = children.get(p.id.as_str()).cloned().unwrap_or_default();
        kids.sort();
        let mut ps = parents.get(p.id.as_str()).cloned().unwrap_or_default();
        ps.sort();

        nodes.insert(
            p.id.clone(),
            NodeView {
                id: p.id.clone(),
                requirement_sets: p.requirement_sets.iter().map(sorted).collect(),
                declared_outputs: sorted(&p.declared_outputs),
                inherited_outputs: sorted(&p.inherited_outputs()),
                outputs: sorted(&p.outputs),
                commands: p.metadata.commands.clone(),
                comments: p.metadata.comments.clone(),
                filter: p.metadata.filter.clone(),
                regex: p.metadata.regex.clone(),
                children: kids,
                parents: ps,
                virtual_root: subgraph.root == Some(*id),
            },
        );
    }

    let root = subgraph.root.map(|id| RootView {
        id: name(id),
        seed: sorted(&graph.program(id).declared_outputs),
    });

    GraphView {
        totals: TotalsView {
            programs: subgraph.nodes.len() - usize::from(root.is_some()),
            edges: edges.len(),
            parameters: graph.universe().len(),
            passes: convergence.passes,
            growth_events: convergence.growth_events,
        },
        root,
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{params, project, Program, Projection, ROOT_ID};
    use pretty_assertions::assert_eq;

    #[test]
    fn whole_graph_view_lists_nodes_and_edges() {
        let (graph, convergence) = Graph::resolve(vec![
            Program::new("A", vec![], params(&["ip"])),
            Program::new("B", vec![params(&["ip"])], params(&["domain"])),
            Program::new("C", vec![params(&["domain"])], params(&[])),
        ])
        .unwrap();
        let view = build_graph_view(&graph, &graph.whole(), &convergence);

        assert!(view.root.is_none());
        assert_eq!(view.totals.programs, 3);
        assert_eq!(view.totals.passes, 2);
        assert_eq!(
            view.edges,
            vec![
                EdgeView { from: "A".into(), to: "B".into(), label: vec!["ip".into()] },
                EdgeView { from: "B".into(), to: "C".into(), label: vec!["domain".into()] },
            ]
        );

        let b = &view.nodes["B"];
        assert_eq!(b.parents, vec!["A"]);
        assert_eq!(b.children, vec!["C"]);
        assert_eq!(b.declared_outputs, vec!["domain"]);
        assert_eq!(b.inherited_outputs, vec!["ip"]);
        assert!(!b.virtual_root);
    }

    #[test]
    fn projection_view_marks_the_root() {
        let projected = project(
            vec![
                Program::new("D", vec![params(&["url"])], params(&["image"])),
                Program::new("E", vec![params(&["ip"])], params(&[])),
            ],
            &params(&["url"]),
        )
        .unwrap();
        let Projection::Reachable(sub) = &projected.projection else {
            panic!("expected a reachable projection");
        };
        let view = build_graph_view(&projected.graph, sub, &projected.convergence);

        let root = view.root.as_ref().unwrap();
        assert_eq!(root.id, ROOT_ID);
        assert_eq!(root.seed, vec!["url"]);
        assert_eq!(view.totals.programs, 1);
        assert!(view.nodes[ROOT_ID].virtual_root);
        assert!(!view.nodes.contains_key("E"));
    }
}
