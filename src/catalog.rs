// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub path: String,
    pub name: String,
    #[serde(rename = "size_MB")]
    pub size_mb: String,
    pub video_length: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total_files: usize,
    pub total_tags: usize,
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

pub fn stats(entries: &[CatalogEntry]) -> CatalogStats {
    CatalogStats {
        total_files: entries.len(),
        total_tags: entries.iter().map(|e| e.tags.len()).sum(),
    }
}

/// A blank document is the window between truncation and the final write of
/// a builder run; it reads as an empty catalog.
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogEntry>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text)
}

pub fn to_pretty_json(entries: &[CatalogEntry]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_document(path: &Path, contents: &str) -> Result<(), CatalogError> {
    fs::write(path, contents).map_err(|source| CatalogError::CatalogWriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Resets the catalog to `[]` so an interrupted run reads as empty, never as
/// half-written.
pub fn truncate_catalog(path: &Path) -> Result<(), CatalogError> {
    write_document(path, "[]")
}

pub fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let json = to_pretty_json(entries).map_err(|e| CatalogError::CatalogWriteFailed {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    write_document(path, &json)
}

pub fn read_catalog(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let unavailable = |reason: String| CatalogError::CatalogUnavailable {
        location: path.display().to_string(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    parse_catalog(&text).map_err(|e| unavailable(format!("invalid catalog JSON: {}", e)))
}

#[cfg(test)]
pub(crate) fn entry(name: &str, path: &str) -> CatalogEntry {
    CatalogEntry {
        path: path.to_string(),
        name: name.to_string(),
        size_mb: "1.00 MB".to_string(),
        video_length: "45 seconds".to_string(),
        tags: crate::names::derive_tags(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 MB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
        assert_eq!(format_size(123_456_789), "117.74 MB");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = to_pretty_json(&[entry("A-1", "/v/A-1.mp4")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value[0].as_object().unwrap();
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["path", "name", "size_MB", "video_length", "tags"]);
        assert!(json.contains("\n    {"));
    }

    #[test]
    fn test_write_then_read_preserves_order_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files_data.json");
        let entries = vec![
            entry("旅行-京都", "/v/旅行-京都.mp4"),
            entry("A-1", "/v/A-1.mp4"),
            entry("B-2", "/v/B-2.mkv"),
        ];

        write_catalog(&path, &entries).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("京都"));
        assert_eq!(read_catalog(&path).unwrap(), entries);
    }

    #[test]
    fn test_truncated_and_blank_catalogs_read_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files_data.json");

        truncate_catalog(&path).unwrap();
        assert!(read_catalog(&path).unwrap().is_empty());

        fs::write(&path, "").unwrap();
        assert!(read_catalog(&path).unwrap().is_empty());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("files_data.json");
        let err = write_catalog(&path, &[]).unwrap_err();
        assert!(matches!(err, CatalogError::CatalogWriteFailed { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_read_missing_or_garbled_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files_data.json");
        assert!(matches!(
            read_catalog(&path),
            Err(CatalogError::CatalogUnavailable { .. })
        ));

        fs::write(&path, "{\"oops\": 1}").unwrap();
        assert!(matches!(
            read_catalog(&path),
            Err(CatalogError::CatalogUnavailable { .. })
        ));
    }

    #[test]
    fn test_stats() {
        let entries = vec![entry("A-1", "/a"), entry("B-2-3", "/b")];
        assert_eq!(
            stats(&entries),
            CatalogStats {
                total_files: 2,
                total_tags: 5
            }
        );
    }
}
