//! Deep traversal of `Node` trees.
//!
//! This module provides the recursive key search and key replacement engine
//! together with the enumerators it is built on.
//!
//! # Modules
//!
//! - `iter`: lazy, cancellable key and element enumerators
//! - `deep`: depth-first search (`collect_by_key`) and mutation (`replace_by_key`)
//! - `flatten`: collapse nested sequences into one ordered list
//!
//! # Example
//!
//! ```
//! use deepquill::document::parser::parse_json;
//! use deepquill::traverse::{collect_by_key_flat, replace_by_key};
//! use deepquill::document::node::Node;
//!
//! let mut tree = parse_json(r#"{"items": [{"price": 10}, {"price": 20}]}"#).unwrap();
//! assert_eq!(collect_by_key_flat(&tree, "price").len(), 2);
//!
//! replace_by_key(&mut tree, "price", Node::from(0));
//! assert_eq!(collect_by_key_flat(&tree, "price"), vec![Node::from(0), Node::from(0)]);
//! ```

pub mod deep;
pub mod flatten;
pub mod iter;

pub use deep::{collect_by_key, collect_by_key_flat, has_key, replace_by_key};
pub use flatten::flatten;
pub use iter::{enumerate_elements, enumerate_keys, CancelToken, Elements, Keys};
