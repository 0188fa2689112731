//! Input discovery: list the record files of a batch.
//!
//! Records are the `*.json` files directly inside the input directory
//! (no recursion), sorted by file name so that runs are reproducible and
//! suffixes like `jane_doe-2` land on the same input every time.

use crate::error::CardGenError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of record files.
pub const RECORD_EXTENSION: &str = "json";

/// Extension of generated documents.
pub const DOCUMENT_EXTENSION: &str = "html";

/// List record files in `dir`, sorted lexicographically by file name.
///
/// # Errors
/// - [`CardGenError::InputDirUnreadable`] if `dir` cannot be listed
/// - [`CardGenError::NoInputFiles`] if it holds no `*.json` files
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, CardGenError> {
    let unreadable = |e| CardGenError::InputDirUnreadable {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() && has_extension(&path, RECORD_EXTENSION) {
            inputs.push(path);
        }
    }

    if inputs.is_empty() {
        return Err(CardGenError::NoInputFiles {
            path: dir.to_path_buf(),
        });
    }

    inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Discovered {} record files in {}", inputs.len(), dir.display());
    Ok(inputs)
}

/// Stems of documents already present in `dir`.
///
/// A missing directory has no documents and yields an empty set.
pub fn existing_output_names(dir: &Path) -> Result<HashSet<String>, CardGenError> {
    let unwritable = |e| CardGenError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(unwritable(e)),
    };

    let mut names = HashSet::new();
    for entry in entries {
        let path = entry.map_err(unwritable)?.path();
        if has_extension(&path, DOCUMENT_EXTENSION) {
            if let Some(stem) = path.file_stem() {
                names.insert(stem.to_string_lossy().into_owned());
            }
        }
    }
    Ok(names)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inputs_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["b.json", "a.json", "c.JSON", "notes.txt", "d.json.bak"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let inputs = discover_inputs(dir.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "c.JSON"]);
    }

    #[test]
    fn test_empty_dir_is_no_input_files() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            discover_inputs(dir.path()),
            Err(CardGenError::NoInputFiles { .. })
        ));
    }

    #[test]
    fn test_missing_dir_is_unreadable() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            discover_inputs(&dir.path().join("missing")),
            Err(CardGenError::InputDirUnreadable { .. })
        ));
    }

    #[test]
    fn test_existing_output_names_lists_html_stems() {
        let dir = TempDir::new().unwrap();
        for name in ["jane_doe.html", "jane_doe-2.html", "style.css"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let names = existing_output_names(dir.path()).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("jane_doe"));
        assert!(names.contains("jane_doe-2"));
    }

    #[test]
    fn test_existing_output_names_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(existing_output_names(&dir.path().join("out"))
            .unwrap()
            .is_empty());
    }
}
