//! Scalar coercion to `f64`.
//!
//! Once the traversal engine has located scalar leaves, callers usually want
//! them as numbers. [`ToFloat`] accepts every integer and float width, plus
//! strings holding a decimal numeral. Everything else, booleans included,
//! fails with [`Error::NotConvertible`].
//!
//! # Example
//!
//! ```
//! use deepquill::coerce::to_float;
//! use deepquill::document::node::Node;
//!
//! assert_eq!(to_float(&1u8).unwrap(), 1.0);
//! assert_eq!(to_float("1.5").unwrap(), 1.5);
//! assert!(to_float(&true).is_err());
//! assert!(to_float(&Node::sequence([])).is_err());
//! ```

use crate::document::node::{Node, Scalar};
use crate::error::{Error, Result};
use serde_json::Value as JsonValue;

/// Conversion of a scalar-like value to `f64`.
pub trait ToFloat {
    fn to_float(&self) -> Result<f64>;
}

/// Converts `value` to `f64`. See [`ToFloat`].
pub fn to_float<T: ToFloat + ?Sized>(value: &T) -> Result<f64> {
    value.to_float()
}

macro_rules! numeric_to_float {
    ($($t:ty),*) => {
        $(impl ToFloat for $t {
            fn to_float(&self) -> Result<f64> {
                Ok(*self as f64)
            }
        })*
    };
}

numeric_to_float!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToFloat for bool {
    fn to_float(&self) -> Result<f64> {
        Err(Error::not_convertible("boolean"))
    }
}

impl ToFloat for str {
    fn to_float(&self) -> Result<f64> {
        let not_convertible = || Error::not_convertible(format!("string {:?}", self));
        let value = self.parse::<f64>().map_err(|_| not_convertible())?;

        // Out-of-range numerals such as "1e400" overflow to infinity.
        if value.is_infinite() && !is_infinity_literal(self) {
            return Err(not_convertible());
        }
        Ok(value)
    }
}

/// Returns true for an explicit, optionally signed, `inf`/`infinity` spelling.
fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text
        .strip_prefix('+')
        .or_else(|| text.strip_prefix('-'))
        .unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl ToFloat for String {
    fn to_float(&self) -> Result<f64> {
        self.as_str().to_float()
    }
}

impl ToFloat for Scalar {
    fn to_float(&self) -> Result<f64> {
        match self {
            Scalar::Integer(i) => i.to_float(),
            Scalar::Unsigned(u) => u.to_float(),
            Scalar::Float(f) => f.to_float(),
            Scalar::String(s) => s.to_float(),
            Scalar::Boolean(_) | Scalar::Null => Err(Error::not_convertible(self.type_name())),
        }
    }
}

impl ToFloat for Node {
    fn to_float(&self) -> Result<f64> {
        match self {
            Node::Scalar(s) => s.to_float(),
            other => Err(Error::not_convertible(other.type_name())),
        }
    }
}

impl ToFloat for JsonValue {
    fn to_float(&self) -> Result<f64> {
        match self {
            JsonValue::Number(n) => n
                .as_f64()
                .ok_or_else(|| Error::not_convertible(format!("number {}", n))),
            JsonValue::String(s) => s.to_float(),
            JsonValue::Bool(_) => Err(Error::not_convertible("boolean")),
            JsonValue::Null => Err(Error::not_convertible("null")),
            JsonValue::Array(_) => Err(Error::not_convertible("sequence")),
            JsonValue::Object(_) => Err(Error::not_convertible("mapping")),
        }
    }
}

impl<T: ToFloat + ?Sized> ToFloat for &T {
    fn to_float(&self) -> Result<f64> {
        (**self).to_float()
    }
}
