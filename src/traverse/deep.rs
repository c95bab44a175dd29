//! Deep key search and in-place replacement.
//!
//! Both walks are depth-first and share one policy: a mapping that directly
//! contains the searched key is a *direct hit*. On a direct hit the walk takes
//! (or overwrites) that entry and does not descend any further into that
//! mapping, neither into sibling keys nor into the matched value. Siblings
//! of the mapping's ancestors are still explored.
//!
//! This means an occurrence of the key nested underneath an already matched
//! mapping is never reported or replaced:
//!
//! ```
//! use deepquill::document::node::Node;
//! use deepquill::traverse::deep::collect_by_key;
//!
//! let tree = Node::mapping([
//!     ("k", Node::from("v")),
//!     ("nested", Node::mapping([("k", Node::from("deeper"))])),
//! ]);
//!
//! assert_eq!(collect_by_key(&tree, "k"), vec![Node::from("v")]);
//! ```
//!
//! Results from sibling keys of one mapping come back in mapping order, which
//! is unspecified. Order within a sequence is preserved.
//!
//! Shape mismatches are never errors: a scalar root, or a key that is absent
//! everywhere, just produces no matches.

use super::flatten::flatten;
use super::iter::{Elements, Keys};
use crate::document::node::Node;
use tracing::{debug, trace};

/// Collects every value stored under `key`, at any depth.
///
/// The result mirrors the shape of the search: each element is either a
/// matched value or a `Node::Sequence` holding the matches found further down
/// one branch. Use [`collect_by_key_flat`] for a flat list.
pub fn collect_by_key(root: &Node, key: &str) -> Vec<Node> {
    let mut result = Vec::new();

    match root {
        Node::Mapping(fields) => {
            if let Some(hit) = fields.get(key) {
                trace!(key, "direct hit");
                result.push(hit.clone());
                return result;
            }

            for k in Keys::new(root) {
                let Some(child) = fields.get(k) else {
                    continue;
                };
                if child.is_mapping_or_sequence() {
                    trace!(key, child = k, "descending");
                    let nested = collect_by_key(child, key);
                    if !nested.is_empty() {
                        result.push(Node::Sequence(nested));
                    }
                }
            }
        }
        Node::Sequence(_) => {
            for (index, item) in Elements::new(root).enumerate() {
                trace!(key, index, "descending");
                let nested = collect_by_key(item, key);
                if !nested.is_empty() {
                    result.push(Node::Sequence(nested));
                }
            }
        }
        Node::Scalar(_) => {}
    }

    result
}

/// Collects every value stored under `key` as one flat, depth-first list.
///
/// Matched values that are themselves sequences are expanded too.
pub fn collect_by_key_flat(root: &Node, key: &str) -> Vec<Node> {
    flatten(&collect_by_key(root, key))
}

/// Overwrites every value stored under `key`, at any depth, with `value`.
///
/// Follows the same direct-hit rule as [`collect_by_key`]: once a mapping has
/// its entry replaced, nothing beneath that mapping is visited. Keys are
/// never created, so a tree without `key` is left untouched.
pub fn replace_by_key(root: &mut Node, key: &str, value: Node) {
    let replaced = replace_in(root, key, &value);
    debug!(key, replaced, "replace finished");
}

fn replace_in(node: &mut Node, key: &str, value: &Node) -> usize {
    match node {
        Node::Mapping(fields) => {
            if let Some(slot) = fields.get_mut(key) {
                debug!(key, "replacing value");
                *slot = value.clone();
                return 1;
            }

            fields
                .values_mut()
                .filter(|child| child.is_mapping_or_sequence())
                .map(|child| replace_in(child, key, value))
                .sum()
        }
        Node::Sequence(items) => items
            .iter_mut()
            .map(|item| replace_in(item, key, value))
            .sum(),
        Node::Scalar(_) => 0,
    }
}

/// Returns true if `root` is a mapping whose own keys include `key`.
///
/// This is a shallow check: nested mappings are not searched.
pub fn has_key(root: &Node, key: &str) -> bool {
    Keys::new(root).any(|k| k == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn leaf(s: &str) -> Node {
        Node::from(s)
    }

    fn sorted_strings(nodes: &[Node]) -> Vec<String> {
        let mut out: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_direct_hit_short_circuits() {
        let tree = Node::mapping([
            ("k", leaf("v")),
            ("nested", Node::mapping([("k", leaf("deeper"))])),
        ]);

        assert_eq!(collect_by_key(&tree, "k"), vec![leaf("v")]);
    }

    #[test]
    fn test_direct_hit_does_not_descend_into_matched_value() {
        let tree = Node::mapping([("k", Node::mapping([("k", leaf("inner"))]))]);

        let found = collect_by_key(&tree, "k");
        assert_eq!(found, vec![Node::mapping([("k", leaf("inner"))])]);
    }

    #[test]
    fn test_nested_shape_mirrors_search() {
        let tree = Node::mapping([("a", Node::mapping([("b", Node::mapping([("k", leaf("v"))]))]))]);

        let found = collect_by_key(&tree, "k");
        assert_eq!(
            found,
            vec![Node::sequence([Node::sequence([leaf("v")])])]
        );
        assert_eq!(collect_by_key_flat(&tree, "k"), vec![leaf("v")]);
    }

    #[test]
    fn test_sibling_branches() {
        let tree = Node::mapping([(
            "A1",
            Node::mapping([
                (
                    "B1",
                    Node::mapping([("C1", Node::mapping([("D1", leaf("val1"))]))]),
                ),
                (
                    "B2",
                    Node::mapping([("C1", Node::mapping([("D1", leaf("val2"))]))]),
                ),
            ]),
        )]);

        let found = collect_by_key_flat(&tree, "D1");
        assert_eq!(sorted_strings(&found), vec!["val1", "val2"]);
    }

    #[test]
    fn test_sequence_order_preserved() {
        let tree = Node::sequence([
            Node::mapping([("id", Node::from(1))]),
            leaf("noise"),
            Node::mapping([("id", Node::from(2))]),
            Node::sequence([Node::mapping([("id", Node::from(3))])]),
        ]);

        assert_eq!(
            collect_by_key_flat(&tree, "id"),
            vec![Node::from(1), Node::from(2), Node::from(3)]
        );
    }

    #[test]
    fn test_scalar_root_has_no_matches() {
        assert!(collect_by_key(&leaf("k"), "k").is_empty());
        assert!(collect_by_key(&Node::null(), "k").is_empty());
        assert!(collect_by_key(&Node::sequence([]), "k").is_empty());
    }

    #[test]
    fn test_scalar_children_of_mapping_skipped() {
        let tree = Node::mapping([("a", leaf("k")), ("b", Node::from(3))]);
        assert!(collect_by_key(&tree, "k").is_empty());
    }

    #[test]
    fn test_replace_all_direct_hits() {
        let mut tree = Node::mapping([(
            "items",
            Node::sequence([
                Node::mapping([("price", Node::from(10))]),
                Node::mapping([("price", Node::from(20))]),
            ]),
        )]);

        replace_by_key(&mut tree, "price", Node::from(0));

        assert_eq!(
            collect_by_key_flat(&tree, "price"),
            vec![Node::from(0), Node::from(0)]
        );
    }

    #[test]
    fn test_replace_stops_under_matched_mapping() {
        let mut tree = Node::mapping([
            ("k", leaf("top")),
            ("nested", Node::mapping([("k", leaf("deeper"))])),
        ]);

        replace_by_key(&mut tree, "k", leaf("new"));

        assert_eq!(tree.get("k"), Some(&leaf("new")));
        assert_eq!(tree.get("nested").unwrap().get("k"), Some(&leaf("deeper")));
    }

    #[test]
    fn test_replace_continues_in_ancestor_siblings() {
        let mut tree = Node::mapping([
            ("left", Node::mapping([("k", leaf("l"))])),
            ("right", Node::mapping([("x", Node::mapping([("k", leaf("r"))]))])),
        ]);

        replace_by_key(&mut tree, "k", leaf("z"));

        assert_eq!(sorted_strings(&collect_by_key_flat(&tree, "k")), vec!["z", "z"]);
    }

    #[test]
    fn test_replace_absent_key_is_noop() {
        let original = Node::mapping([
            ("a", Node::sequence([Node::from(1), Node::mapping([("b", leaf("c"))])])),
        ]);
        let mut tree = original.clone();

        replace_by_key(&mut tree, "missing", leaf("x"));

        assert_eq!(tree, original);
    }

    #[test]
    fn test_replace_on_scalar_root_is_noop() {
        let mut tree = leaf("k");
        replace_by_key(&mut tree, "k", leaf("x"));
        assert_eq!(tree, leaf("k"));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_collect_traces_descent() {
        let tree = Node::mapping([(
            "outer",
            Node::sequence([Node::mapping([("k", leaf("v"))])]),
        )]);
        let log = CapturedLog::default();
        let sink = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();

        let found = tracing::subscriber::with_default(subscriber, || {
            collect_by_key_flat(&tree, "k")
        });

        assert_eq!(found, vec![leaf("v")]);
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("descending"));
        assert!(output.contains("child=\"outer\"") || output.contains("child=outer"));
        assert!(output.contains("index=0"));
        assert!(output.contains("direct hit"));
    }

    #[test]
    fn test_has_key_is_shallow() {
        let tree = Node::mapping([("a", Node::mapping([("b", Node::from(1))]))]);
        assert!(has_key(&tree, "a"));
        assert!(!has_key(&tree, "b"));
    }

    #[test]
    fn test_has_key_on_non_mapping() {
        assert!(!has_key(&Node::sequence([leaf("a")]), "a"));
        assert!(!has_key(&leaf("a"), "a"));
    }
}
