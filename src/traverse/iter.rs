//! Lazy, cancellable enumeration of mapping keys and sequence elements.
//!
//! Both enumerators are plain pull-based iterators over a borrowed tree. An
//! item is produced only when the consumer calls `next()`, so nothing is ever
//! buffered ahead of the consumer and no collection is materialised up front.
//!
//! Cancellation is cooperative. A [`CancelToken`] can be shared with other
//! code (or another thread) and is checked before every yield; calling
//! `cancel()` on the enumerator itself, or simply dropping it, has the same
//! effect. Once cancelled, the enumerator releases its cursor and stays
//! exhausted.
//!
//! # Example
//!
//! ```
//! use deepquill::document::node::Node;
//! use deepquill::traverse::iter::{CancelToken, Elements};
//!
//! let seq = Node::sequence([Node::from(1), Node::from(2), Node::from(3)]);
//! let token = CancelToken::new();
//! let mut elements = Elements::with_cancel(&seq, token.clone());
//!
//! assert_eq!(elements.next(), Some(&Node::from(1)));
//! token.cancel();
//! assert_eq!(elements.next(), None);
//! ```

use crate::document::node::Node;
use indexmap::map;
use std::iter::FusedIterator;
use std::slice;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shareable cancellation flag for enumerators.
///
/// Clones observe the same flag, so a consumer can hand one clone to an
/// enumerator and keep another to stop it later.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Lazily yields the keys of a mapping.
///
/// Key order is whatever the mapping provides and must not be relied upon.
/// A non-mapping node yields nothing.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    cursor: Option<map::Keys<'a, String, Node>>,
    token: Option<CancelToken>,
}

impl<'a> Keys<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self {
            cursor: node.as_mapping().map(|m| m.keys()),
            token: None,
        }
    }

    /// Creates an enumerator that stops as soon as `token` is cancelled.
    pub fn with_cancel(node: &'a Node, token: CancelToken) -> Self {
        Self {
            token: Some(token),
            ..Self::new(node)
        }
    }

    /// Stops the enumerator and releases its cursor.
    pub fn cancel(&mut self) {
        self.cursor = None;
    }

    /// Returns true once the enumerator can produce no more keys.
    pub fn is_finished(&self) -> bool {
        self.cursor.is_none()
    }

    fn observe_cancel(&mut self) {
        if self.token.as_ref().is_some_and(CancelToken::is_cancelled) {
            self.cursor = None;
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.observe_cancel();
        let key = self.cursor.as_mut()?.next();
        if key.is_none() {
            self.cursor = None;
        }
        key.map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.cursor {
            // A pending cancel may cut the enumeration short.
            Some(cursor) => (0, Some(cursor.len())),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Keys<'_> {}

/// Lazily yields the elements of a sequence in index order.
///
/// A non-sequence node yields nothing.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    cursor: Option<slice::Iter<'a, Node>>,
    token: Option<CancelToken>,
}

impl<'a> Elements<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self {
            cursor: node.as_sequence().map(|items| items.iter()),
            token: None,
        }
    }

    /// Creates an enumerator that stops as soon as `token` is cancelled.
    pub fn with_cancel(node: &'a Node, token: CancelToken) -> Self {
        Self {
            token: Some(token),
            ..Self::new(node)
        }
    }

    /// Stops the enumerator and releases its cursor.
    pub fn cancel(&mut self) {
        self.cursor = None;
    }

    /// Returns true once the enumerator can produce no more elements.
    pub fn is_finished(&self) -> bool {
        self.cursor.is_none()
    }

    fn observe_cancel(&mut self) {
        if self.token.as_ref().is_some_and(CancelToken::is_cancelled) {
            self.cursor = None;
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        self.observe_cancel();
        let item = self.cursor.as_mut()?.next();
        if item.is_none() {
            self.cursor = None;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.cursor {
            Some(cursor) => (0, Some(cursor.len())),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Elements<'_> {}

/// Enumerates the keys of `node`, or nothing if it is not a mapping.
pub fn enumerate_keys(node: &Node) -> Keys<'_> {
    Keys::new(node)
}

/// Enumerates the elements of `node`, or nothing if it is not a sequence.
pub fn enumerate_elements(node: &Node) -> Elements<'_> {
    Elements::new(node)
}
