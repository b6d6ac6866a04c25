//! Record loading and saving utilities
//!
//! Generic helpers for the YAML records a project holds (purchase orders,
//! uploaded receipts), so command implementations don't repeat the
//! directory scanning.

use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load all records of type T from a directory
///
/// Scans the directory for .yaml files and deserializes them.
/// Files that fail to parse are skipped with a warning.
pub fn load_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut records = Vec::new();

    if !dir.exists() {
        return Ok(records);
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).into_diagnostic()? {
        let path = entry.into_diagnostic()?.path();
        if path.extension().is_some_and(|e| e == "yaml") {
            paths.push(path);
        }
    }
    // ULID file names sort by creation time
    paths.sort();

    for path in paths {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        match serde_yml::from_str::<T>(&content) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record"),
        }
    }

    Ok(records)
}

/// Find a record file by ID (supports partial matching)
///
/// Searches for a file whose stem contains the given ID.
/// Returns the first match in file-name order.
pub fn find_entity_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.exists() {
        return None;
    }

    let needle = id.trim().to_uppercase();
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|e| e == "yaml"))
        .filter(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.to_uppercase().contains(&needle))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Load a single record by ID
///
/// Returns the path and record if found.
pub fn load_entity<T: DeserializeOwned>(dir: &Path, id: &str) -> Result<Option<(PathBuf, T)>> {
    if let Some(path) = find_entity_file(dir, id) {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        let record: T = serde_yml::from_str(&content).into_diagnostic()?;
        return Ok(Some((path, record)));
    }
    Ok(None)
}

/// Serialize a record to YAML and write it, creating parent directories
pub fn save_entity<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(record).into_diagnostic()?;
    fs::write(path, yaml).into_diagnostic()?;
    tracing::debug!(path = %path.display(), "record written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_all_empty_dir() {
        let dir = tempdir().unwrap();
        let result: Result<Vec<serde_json::Value>> = load_all(dir.path());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_load_all_nonexistent_dir() {
        let result: Result<Vec<serde_json::Value>> = load_all(Path::new("/nonexistent/path"));
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_load_all_skips_broken_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("PO-A.yaml"), "id: a\n").unwrap();
        fs::write(dir.path().join("PO-B.yaml"), "id: [unclosed\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "id: c\n").unwrap();

        let records: Vec<serde_json::Value> = load_all(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "a");
    }

    #[test]
    fn test_find_entity_file_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("PO-01J123456789ABCDEF.yaml");
        fs::write(&file_path, "id: PO-01J123456789ABCDEF").unwrap();

        assert_eq!(find_entity_file(dir.path(), "po-01j1234").unwrap(), file_path);
        assert!(find_entity_file(dir.path(), "RCPT-").is_none());
    }

    #[test]
    fn test_save_then_load_entity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/PO-X.yaml");
        save_entity(&path, &serde_json::json!({"id": "PO-X", "total": 10})).unwrap();

        let (found, value): (PathBuf, serde_json::Value) =
            load_entity(&dir.path().join("nested"), "PO-X").unwrap().unwrap();
        assert_eq!(found, path);
        assert_eq!(value["total"], 10);
    }
}
