//! Document model: the dynamically-typed tree and its conversions.
//!
//! - `node`: the `Node` tree and its type classifier
//! - `parser`: conversions from decoded JSON/YAML values

pub mod node;
pub mod parser;

pub use node::{Kind, Node, Scalar};
