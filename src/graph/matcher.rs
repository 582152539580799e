//! Requirement matching: can a set of outputs invoke a program?

use super::{ParamSet, Program};

/// True if at least one bundle in `requirement_sets` is a subset of `outputs`.
///
/// An empty `requirement_sets` means the program needs nothing and is always
/// invokable.
pub fn satisfies(outputs: &ParamSet, requirement_sets: &[ParamSet]) -> bool {
    requirement_sets.is_empty() || requirement_sets.iter().any(|b| b.is_subset(outputs))
}

/// Bundles of `requirement_sets` fully covered by `outputs`, in declaration order.
pub fn satisfied_bundles<'a>(
    outputs: &'a ParamSet,
    requirement_sets: &'a [ParamSet],
) -> impl Iterator<Item = &'a ParamSet> + 'a {
    requirement_sets.iter().filter(move |b| b.is_subset(outputs))
}

/// True if `outputs` can feed `consumer`.
///
/// A consumer with no bundles at all is invokable from nothing, so nothing
/// feeds it. An empty bundle is satisfied by any producer.
pub fn feeds(outputs: &ParamSet, consumer: &Program) -> bool {
    !consumer.requirement_sets.is_empty() && satisfies(outputs, &consumer.requirement_sets)
}

/// Union of the consumer bundles that `outputs` satisfies; the edge label.
pub fn feed_label(outputs: &ParamSet, consumer: &Program) -> ParamSet {
    satisfied_bundles(outputs, &consumer.requirement_sets)
        .flat_map(|b| b.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::params;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_requirements_are_always_satisfied() {
        assert!(satisfies(&params(&[]), &[]));
        assert!(satisfies(&params(&["ip"]), &[]));
    }

    #[test]
    fn any_bundle_is_enough() {
        let reqs = vec![params(&["domain", "port"]), params(&["ip"])];
        assert!(satisfies(&params(&["ip", "url"]), &reqs));
        assert!(satisfies(&params(&["domain", "port"]), &reqs));
        assert!(!satisfies(&params(&["domain"]), &reqs));
        assert!(!satisfies(&params(&[]), &reqs));
    }

    #[test]
    fn bundle_needs_every_member() {
        let reqs = vec![params(&["domain", "port"])];
        assert!(!satisfies(&params(&["domain", "ip"]), &reqs));
    }

    #[test]
    fn requirement_free_consumer_is_never_fed() {
        let root = Program::new("root", vec![], params(&["ip"]));
        assert!(!feeds(&params(&["ip"]), &root));
        assert!(!feeds(&params(&[]), &root));
    }

    #[test]
    fn empty_bundle_is_fed_by_anything() {
        let anything = Program::new("anything", vec![params(&[])], params(&[]));
        assert!(feeds(&params(&["ip"]), &anything));
        assert!(feeds(&params(&[]), &anything));
        assert_eq!(feed_label(&params(&["ip"]), &anything), params(&[]));

        let either = Program::new("either", vec![params(&["url"]), params(&[])], params(&[]));
        assert_eq!(
            feeds(&params(&["ip"]), &either),
            satisfies(&params(&["ip"]), &either.requirement_sets)
        );
    }

    #[test]
    fn label_is_union_of_satisfied_bundles() {
        let consumer = Program::new(
            "nmap",
            vec![params(&["ip"]), params(&["domain", "port"]), params(&["asn"])],
            params(&["service"]),
        );
        let label = feed_label(&params(&["ip", "domain", "port", "url"]), &consumer);
        assert_eq!(label, params(&["domain", "ip", "port"]));
        assert!(feeds(&params(&["ip"]), &consumer));
    }
}
