//! File I/O operations for documents.
//!
//! This module provides functionality to load JSON/YAML files from disk or
//! stdin, and save trees back to files with atomic write operations and
//! optional backups.

pub mod loader;
pub mod saver;
