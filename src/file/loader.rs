//! Document loading.
//!
//! This module provides functions to load JSON or YAML documents from files
//! or stdin and convert them into `Node` trees. Files ending in `.gz` are
//! decompressed first.

use crate::document::node::Node;
use crate::document::parser::{parse_json, parse_yaml};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Document formats understood by the loader and saver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Determines the format from a filename, ignoring a trailing `.gz`.
    ///
    /// `.yaml` and `.yml` select YAML; everything else is treated as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use deepquill::file::loader::Format;
    ///
    /// assert_eq!(Format::from_path("data.yml.gz"), Format::Yaml);
    /// assert_eq!(Format::from_path("data.json"), Format::Json);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let base = path_str.strip_suffix(".gz").unwrap_or(&*path_str);

        if base.ends_with(".yaml") || base.ends_with(".yml") {
            Format::Yaml
        } else {
            Format::Json
        }
    }
}

pub(crate) fn is_gzipped<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

/// Loads and parses a JSON or YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decompressed, or if its
/// contents are not valid for the format implied by the filename.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path_ref = path.as_ref();

    let content = if is_gzipped(path_ref) {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read {}", path_ref.display()))?
    };

    let format = Format::from_path(path_ref);
    debug!(path = %path_ref.display(), ?format, bytes = content.len(), "loading document");

    match format {
        Format::Json => parse_json(&content).context("Failed to parse JSON"),
        Format::Yaml => parse_yaml(&content).context("Failed to parse YAML"),
    }
}

/// Loads a document from standard input.
///
/// Gzip input is detected by its magic bytes. The content is tried as JSON
/// first, then as YAML.
pub fn load_from_stdin() -> Result<Node> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = decode_bytes(buffer)?;
    parse_any(&content).context("Failed to parse stdin: input is neither valid JSON nor valid YAML")
}

/// Parses `content` as JSON, falling back to YAML.
pub fn parse_any(content: &str) -> Result<Node> {
    if let Ok(node) = parse_json(content) {
        return Ok(node);
    }
    parse_yaml(content)
}

fn decode_bytes(buffer: Vec<u8>) -> Result<String> {
    // Check for gzip magic bytes (0x1f 0x8b)
    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")
    }
}

fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = fs::read(path).context("Failed to open gzipped file")?;
    decompress_gzip_bytes(&bytes)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzip data - input may be corrupted")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("a.json"), Format::Json);
        assert_eq!(Format::from_path("a.json.gz"), Format::Json);
        assert_eq!(Format::from_path("a.yaml"), Format::Yaml);
        assert_eq!(Format::from_path("a.yml.gz"), Format::Yaml);
        assert_eq!(Format::from_path("no_extension"), Format::Json);
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped("x.json.gz"));
        assert!(!is_gzipped("x.json"));
        assert!(!is_gzipped("gz"));
    }

    #[test]
    fn test_parse_any_prefers_json() {
        let node = parse_any(r#"{"a": "1"}"#).unwrap();
        assert_eq!(node.get("a"), Some(&Node::from("1")));
    }

    #[test]
    fn test_parse_any_falls_back_to_yaml() {
        let node = parse_any("a: 1\nb: [x, y]\n").unwrap();
        assert_eq!(node.get("a"), Some(&Node::from(1i64)));
    }

    #[test]
    fn test_decode_gzip_bytes() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{\"k\": true}").unwrap();
        let compressed = encoder.finish().unwrap();

        let text = decode_bytes(compressed).unwrap();
        assert_eq!(text, "{\"k\": true}");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert!(decode_bytes(vec![0xff, 0xfe, 0xfd]).is_err());
    }
}
