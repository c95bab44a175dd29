//! DeepQuill - deep key search and replacement for dynamically-typed trees.
//!
//! Documents decoded from schema-less formats such as JSON or YAML are trees
//! where every node is a mapping, a sequence or a scalar. This crate finds
//! every value stored under a key at any depth, overwrites such values in
//! place, flattens nested results, and coerces scalar leaves to numbers.
//!
//! # Example
//!
//! ```
//! use deepquill::coerce::to_float;
//! use deepquill::document::parser::parse_json;
//! use deepquill::traverse::collect_by_key_flat;
//!
//! let tree = parse_json(r#"{"orders": [{"total": 10}, {"total": "2.5"}]}"#).unwrap();
//! let sum: f64 = collect_by_key_flat(&tree, "total")
//!     .iter()
//!     .filter_map(|n| to_float(n).ok())
//!     .sum();
//! assert_eq!(sum, 12.5);
//! ```

pub mod coerce;
pub mod config;
pub mod document;
pub mod error;
pub mod file;
pub mod pretty;
pub mod traverse;

pub use coerce::{to_float, ToFloat};
pub use document::node::{Kind, Node, Scalar};
pub use error::{Error, Result};
pub use traverse::{collect_by_key, collect_by_key_flat, flatten, has_key, replace_by_key};
