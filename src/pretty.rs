//! Best-effort pretty-printing for diagnostics.
//!
//! [`prettify`] renders any serializable value as indented JSON. If the
//! serializer refuses the value, the original is handed back untouched, so
//! callers can always log the result without handling an error.
//!
//! # Example
//!
//! ```
//! use deepquill::document::node::Node;
//! use deepquill::pretty::{prettify, Pretty};
//!
//! let node = Node::mapping([("a", Node::from(1))]);
//! match prettify(&node) {
//!     Pretty::Rendered(text) => assert_eq!(text, "{\n  \"a\": 1\n}"),
//!     Pretty::Original(_) => unreachable!(),
//! }
//! ```

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fmt;

/// Default indentation width, in spaces.
pub const DEFAULT_INDENT: usize = 2;

/// Result of a best-effort render.
#[derive(Debug, Clone, PartialEq)]
pub enum Pretty<'a, T: ?Sized> {
    /// The value rendered as text
    Rendered(String),
    /// Serialization failed; the value is returned unchanged
    Original(&'a T),
}

impl<'a, T: ?Sized> Pretty<'a, T> {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Pretty::Rendered(_))
    }

    /// Returns the rendered text, if serialization succeeded.
    pub fn rendered(&self) -> Option<&str> {
        match self {
            Pretty::Rendered(text) => Some(text),
            Pretty::Original(_) => None,
        }
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Display for Pretty<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pretty::Rendered(text) => f.write_str(text),
            Pretty::Original(value) => write!(f, "{:?}", value),
        }
    }
}

/// Renders `value` as JSON indented by [`DEFAULT_INDENT`] spaces.
pub fn prettify<T: Serialize + ?Sized>(value: &T) -> Pretty<'_, T> {
    prettify_indent(value, DEFAULT_INDENT)
}

/// Renders `value` as JSON indented by `indent` spaces.
pub fn prettify_indent<T: Serialize + ?Sized>(value: &T, indent: usize) -> Pretty<'_, T> {
    let indent_str = " ".repeat(indent);
    prettify_with(value, |v| {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent_str.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        v.serialize(&mut ser)?;
        // serde_json only ever writes UTF-8.
        Ok::<_, serde_json::Error>(String::from_utf8_lossy(&buf).into_owned())
    })
}

/// Renders `value` with a caller-supplied serializer.
///
/// Any error from `render` is swallowed and the original value returned.
pub fn prettify_with<'a, T, F, E>(value: &'a T, render: F) -> Pretty<'a, T>
where
    T: ?Sized,
    F: FnOnce(&T) -> Result<String, E>,
{
    match render(value) {
        Ok(text) => Pretty::Rendered(text),
        Err(_) => Pretty::Original(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::Node;
    use std::collections::HashMap;

    #[test]
    fn test_prettify_node() {
        let node = Node::mapping([("list", Node::sequence([Node::from(1), Node::from("a")]))]);
        let pretty = prettify(&node);
        assert_eq!(
            pretty.rendered(),
            Some("{\n  \"list\": [\n    1,\n    \"a\"\n  ]\n}")
        );
    }

    #[test]
    fn test_prettify_custom_indent() {
        let node = Node::sequence([Node::from(true)]);
        assert_eq!(prettify_indent(&node, 4).to_string(), "[\n    true\n]");
    }

    #[test]
    fn test_unserializable_falls_back_to_original() {
        // JSON object keys must be strings.
        let mut map = HashMap::new();
        map.insert(vec![1u8], "v");

        let pretty = prettify(&map);
        assert!(!pretty.is_rendered());
        assert_eq!(pretty, Pretty::Original(&map));
        assert_eq!(pretty.to_string(), format!("{:?}", map));
    }

    #[test]
    fn test_prettify_with_custom_serializer() {
        let node = Node::from("x");
        let yaml = prettify_with(&node, serde_yaml::to_string);
        assert_eq!(yaml.rendered(), Some("x\n"));

        let failed = prettify_with(&node, |_| Err::<String, _>("nope"));
        assert_eq!(failed, Pretty::Original(&node));
    }
}
