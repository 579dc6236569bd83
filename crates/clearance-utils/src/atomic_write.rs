//! Atomic file writes: temp file in the target directory, then rename.
//!
//! Used by the persistence layer (C5) for PDFs and extraction JSON, by the
//! run allocator (C2) is deliberately exempt (it needs `create_new`
//! exclusivity, not atomic replace), and by the checklist store (C6) for its
//! hot-update `replace` path.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Write `bytes` to `path` atomically: write to a sibling temp file, fsync,
/// then rename over the target. Creates parent directories as needed.
pub fn write_bytes_atomic(path: &Utf8Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create parent directory: {parent}"))?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in: {parent}"))?;
    temp.write_all(bytes)
        .with_context(|| format!("failed to write temp file for: {path}"))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("failed to fsync temp file for: {path}"))?;
    temp.persist(path.as_std_path())
        .map_err(|e| e.error)
        .with_context(|| format!("failed to rename temp file into place: {path}"))?;

    Ok(())
}

/// Serialize `value` as pretty-printed JSON and write it atomically.
///
/// Used by C5's `save_extraction` and C6's `replace`.
pub fn write_json_atomic(path: &Utf8Path, value: &serde_json::Value) -> Result<()> {
    let content = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize JSON for: {path}"))?;
    write_bytes_atomic(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_bytes_atomic_creates_parent_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(&dir.path().join("sub").join("file.pdf")).unwrap();

        write_bytes_atomic(path, b"%PDF-fake").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"%PDF-fake");
    }

    #[test]
    fn write_bytes_atomic_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(&dir.path().join("file.pdf")).unwrap();

        write_bytes_atomic(path, b"first").unwrap();
        write_bytes_atomic(path, b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn write_json_atomic_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(&dir.path().join("record.json")).unwrap();

        write_json_atomic(path, &serde_json::json!({"a": 1})).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("\"a\": 1"));
    }
}
