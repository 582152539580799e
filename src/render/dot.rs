//! Graphviz DOT output.
//!
//! Every edge goes through a rectangle node carrying its label:
//! producer -> [label] -> consumer. Feed the result to `dot -Tsvg`.

use crate::model::GraphView;
use std::fmt::Write;

pub fn render_dot(view: &GraphView) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "digraph programs {{")?;
    writeln!(out, "  rankdir=LR;")?;
    writeln!(out, "  node [shape=ellipse];")?;

    for node in view.nodes.values() {
        if node.virtual_root {
            let label = format!("{}\n{}", node.id, node.declared_outputs.join(", "));
            writeln!(out, "  {} [shape=doubleoctagon, label={}];", quote(&node.id), quote(&label))?;
        } else {
            writeln!(out, "  {};", quote(&node.id))?;
        }
    }

    for edge in &view.edges {
        let via = quote(&format!("{}->{}", edge.from, edge.to));
        writeln!(out, "  {} [shape=rectangle, label={}];", via, quote(&edge.label.join(", ")))?;
        writeln!(out, "  {} -> {};", quote(&edge.from), via)?;
        writeln!(out, "  {} -> {};", via, quote(&edge.to))?;
    }

    writeln!(out, "}}")?;
    Ok(out)
}

/// Quote a DOT identifier.
fn quote(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for c in s.chars() {
        match c {
            '"' => q.push_str("\\\""),
            '\\' => q.push_str("\\\\"),
            '\n' => q.push_str("\\n"),
            _ => q.push(c),
        }
    }
    q.push('"');
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{params, project, Program, Projection};
    use crate::model::build_graph_view;
    use pretty_assertions::assert_eq;

    #[test]
    fn projection_renders_root_and_edge_nodes() {
        let projected = project(
            vec![Program::new("shot", vec![params(&["url"])], params(&["image"]))],
            &params(&["url"]),
        )
        .unwrap();
        let Projection::Reachable(sub) = &projected.projection else {
            panic!("expected a reachable projection");
        };
        let view = build_graph_view(&projected.graph, sub, &projected.convergence);

        let dot = render_dot(&view).unwrap();
        assert_eq!(
            dot,
            r#"digraph programs {
  rankdir=LR;
  node [shape=ellipse];
  "input" [shape=doubleoctagon, label="input\nurl"];
  "shot";
  "input->shot" [shape=rectangle, label="url"];
  "input" -> "input->shot";
  "input->shot" -> "shot";
}
"#
        );
    }

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(quote("two\nlines"), r#""two\nlines""#);
    }
}
