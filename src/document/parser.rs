//! Conversions between decoded documents and [`Node`] trees.
//!
//! Decoding itself is left to serde: JSON comes in as `serde_json::Value`,
//! YAML as `serde_yaml::Value`, and both are converted into the crate's own
//! tagged representation. `Node` also implements `Serialize` and
//! `Deserialize`, so any serde format can produce or render one directly.
//!
//! # Example
//!
//! ```
//! use deepquill::document::node::Node;
//! use deepquill::document::parser::parse_json;
//!
//! let node = parse_json(r#"{"name": "Alice", "age": 30}"#).unwrap();
//! assert_eq!(node.get("age"), Some(&Node::from(30i64)));
//! ```

use super::node::{Node, Scalar};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::fmt;

/// Parses a JSON document into a tree.
pub fn parse_json(source: &str) -> Result<Node> {
    let value: JsonValue = serde_json::from_str(source).context("Invalid JSON")?;
    Ok(Node::from(value))
}

/// Parses a YAML document into a tree.
///
/// Non-string mapping keys are rendered to their textual form, since tree
/// keys are always strings.
pub fn parse_yaml(source: &str) -> Result<Node> {
    let value: YamlValue = serde_yaml::from_str(source).context("Invalid YAML")?;
    Ok(Node::from(value))
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::null(),
            JsonValue::Bool(b) => Node::from(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::from(i)
                } else if let Some(u) = n.as_u64() {
                    Node::from(u)
                } else {
                    Node::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Node::from(s),
            JsonValue::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            JsonValue::Object(fields) => {
                Node::Mapping(fields.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<YamlValue> for Node {
    fn from(value: YamlValue) -> Self {
        match value {
            YamlValue::Null => Node::null(),
            YamlValue::Bool(b) => Node::from(b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::from(i)
                } else if let Some(u) = n.as_u64() {
                    Node::from(u)
                } else {
                    Node::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            YamlValue::String(s) => Node::from(s),
            YamlValue::Sequence(items) => {
                Node::Sequence(items.into_iter().map(Node::from).collect())
            }
            YamlValue::Mapping(fields) => Node::Mapping(
                fields
                    .into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Node::from(v)))
                    .collect(),
            ),
            YamlValue::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

fn yaml_key_to_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Unsigned(u) => serializer.serialize_u64(*u),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Boolean(b) => serializer.serialize_bool(*b),
            Scalar::Null => serializer.serialize_unit(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Mapping(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Scalar(s) => s.serialize(serializer),
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any mapping, sequence or scalar value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Node, E> {
        // Keep small unsigned values in the signed variant, like serde_json does.
        match i64::try_from(v) {
            Ok(i) => Ok(Node::from(i)),
            Err(_) => Ok(Node::from(v)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Node, D::Error> {
        Node::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Node, A::Error> {
        let mut fields = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, Node>()? {
            fields.insert(k, v);
        }
        Ok(Node::Mapping(fields))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Node, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}
