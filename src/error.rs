//! Error types for deepquill.
//!
//! Traversal never fails: a shape mismatch simply yields no matches. The only
//! fallible library operation is numeric coercion.

use thiserror::Error;

/// Errors produced by the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The value is not a number and not numeral-shaped text.
    #[error("can't convert {found} to float")]
    NotConvertible {
        /// Description of the offending value, e.g. `boolean` or `string "abc"`.
        found: String,
    },
}

impl Error {
    pub(crate) fn not_convertible(found: impl Into<String>) -> Self {
        Error::NotConvertible {
            found: found.into(),
        }
    }
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;
