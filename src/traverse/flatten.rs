//! Depth-first flattening of nested sequences.

use crate::document::node::Node;

/// Flattens arbitrarily nested sequences into one list.
///
/// Every `Node::Sequence` element is expanded in place, recursively; every
/// other element is kept as-is. Left-to-right order is preserved and empty
/// sequences contribute nothing.
///
/// # Example
///
/// ```
/// use deepquill::document::node::Node;
/// use deepquill::traverse::flatten::flatten;
///
/// let nested = [
///     Node::from(1),
///     Node::sequence([Node::from(2), Node::sequence([Node::from(3)])]),
/// ];
/// assert_eq!(flatten(&nested), vec![Node::from(1), Node::from(2), Node::from(3)]);
/// ```
pub fn flatten(items: &[Node]) -> Vec<Node> {
    let mut out = Vec::with_capacity(items.len());
    flatten_into(items, &mut out);
    out
}

fn flatten_into(items: &[Node], out: &mut Vec<Node>) {
    for item in items {
        match item {
            Node::Sequence(inner) => flatten_into(inner, out),
            other => out.push(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ints(values: &[i64]) -> Vec<Node> {
        values.iter().copied().map(Node::from).collect()
    }

    #[test]
    fn test_flatten_two_levels() {
        let nested = vec![
            Node::from(1i64),
            Node::from(2i64),
            Node::sequence([
                Node::from(3i64),
                Node::from(4i64),
                Node::sequence(ints(&[5, 6])),
            ]),
        ];
        assert_eq!(flatten(&nested), ints(&[1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_flatten_deep() {
        let nested = vec![
            Node::from(1i64),
            Node::from(2i64),
            Node::sequence([
                Node::from(3i64),
                Node::from(4i64),
                Node::sequence([
                    Node::from(5i64),
                    Node::from(6i64),
                    Node::sequence(ints(&[7, 8])),
                    Node::from(9i64),
                ]),
            ]),
        ];
        assert_eq!(flatten(&nested), ints(&[1, 2, 3, 4, 5, 6, 7, 8, 9]));
    }

    #[test]
    fn test_empty_sequences_vanish() {
        let nested = vec![
            Node::sequence([]),
            Node::sequence([Node::sequence([])]),
            Node::from("x"),
        ];
        assert_eq!(flatten(&nested), vec![Node::from("x")]);
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_mappings_are_not_expanded() {
        let map = Node::mapping([("a", Node::sequence(ints(&[1, 2])))]);
        let nested = vec![Node::sequence([map.clone()])];
        assert_eq!(flatten(&nested), vec![map]);
    }

    fn nested_strategy() -> impl Strategy<Value = Node> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(Node::from),
            "[a-z]{0,4}".prop_map(Node::from),
            any::<bool>().prop_map(Node::from),
        ];
        leaf.prop_recursive(4, 32, 5, |inner| {
            prop::collection::vec(inner, 0..5).prop_map(Node::Sequence)
        })
    }

    proptest! {
        #[test]
        fn prop_flatten_is_idempotent(items in prop::collection::vec(nested_strategy(), 0..6)) {
            let once = flatten(&items);
            prop_assert_eq!(flatten(&once), once);
        }

        #[test]
        fn prop_flatten_leaves_no_sequences(items in prop::collection::vec(nested_strategy(), 0..6)) {
            prop_assert!(flatten(&items).iter().all(|n| !n.is_sequence()));
        }
    }
}
