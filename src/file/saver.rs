//! Document saving.
//!
//! This module writes `Node` trees back to disk as JSON or YAML, chosen by the
//! target filename, with atomic writes, optional gzip compression and
//! optional backups.

use super::loader::{is_gzipped, Format};
use crate::config::Config;
use crate::document::node::Node;
use crate::pretty::prettify_indent;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serializes `node` in the given format.
///
/// JSON output is indented by `indent_size` spaces and ends with a newline.
pub fn serialize_node(node: &Node, format: Format, indent_size: usize) -> Result<String> {
    match format {
        Format::Json => {
            let mut text = prettify_indent(node, indent_size)
                .rendered()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("Failed to serialize document as JSON"))?;
            text.push('\n');
            Ok(text)
        }
        Format::Yaml => serde_yaml::to_string(node).context("Failed to serialize document as YAML"),
    }
}

/// Saves a tree to a file, optionally backing up the existing file first.
///
/// The format follows the filename (see [`Format::from_path`]) and a `.gz`
/// suffix compresses the output. The write is atomic: data goes to a temporary
/// sibling file which is then renamed over the target.
///
/// # Examples
///
/// ```no_run
/// use deepquill::config::Config;
/// use deepquill::document::node::Node;
/// use deepquill::file::saver::save_file;
///
/// let node = Node::mapping([("name", Node::from("deepquill"))]);
/// save_file("output.json", &node, &Config::default()).unwrap();
/// ```
pub fn save_file<P: AsRef<Path>>(path: P, node: &Node, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path);

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let text = serialize_node(node, format, config.indent_size)?;
    debug!(path = %path.display(), ?format, bytes = text.len(), "saving document");
    write_file_atomic(path, text.as_bytes(), is_gzipped(path))
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup(path: &Path) -> Result<()> {
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic(path: &Path, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut temp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let written = (|| -> Result<()> {
        if compress {
            let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder
                .write_all(data)
                .context("Failed to write compressed data")?;
            encoder.finish().context("Failed to finish compression")?;
        } else {
            fs::write(&temp_path, data).context("Failed to write temp file")?;
        }

        fs::rename(&temp_path, path).context("Failed to rename temp file")
    })();

    if written.is_err() {
        // Never leave a partial temp file next to the target.
        let _ = fs::remove_file(&temp_path);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_json_uses_indent() {
        let node = Node::mapping([("a", Node::sequence([Node::from(1)]))]);
        let text = serialize_node(&node, Format::Json, 4).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}\n");
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::TempDir::new().unwrap();
        // A non-empty directory at the target path makes the final rename fail.
        let target = dir.path().join("doc.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let node = Node::mapping([("a", Node::from(1))]);
        assert!(save_file(&target, &node, &Config::default()).is_err());

        assert!(!dir.path().join("doc.json.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_failed_compressed_write_removes_temp_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("doc.json.gz");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let node = Node::mapping([("a", Node::from(1))]);
        assert!(save_file(&target, &node, &Config::default()).is_err());

        assert!(!dir.path().join("doc.json.gz.tmp").exists());
    }

    #[test]
    fn test_serialize_yaml() {
        let node = Node::mapping([("a", Node::from("b"))]);
        let text = serialize_node(&node, Format::Yaml, 2).unwrap();
        assert_eq!(text, "a: b\n");
    }
}
