//! Directory listing for the watched drop location.
//!
//! Every invocation is a full snapshot of the directory's current contents —
//! there is no watch or notification mechanism. Deduplication against what
//! has already been seen is the reconciler's job, not the lister's, so no
//! filtering happens here.

use anyhow::{bail, Result};
use chrono::Utc;
use walkdir::WalkDir;

use crate::models::FileArrival;

/// List the files directly under `root` (single level, no recursion).
///
/// Each entry carries its base name, lowercased extension, size, full path,
/// and a discovery timestamp stamped now — not the file's own mtime.
pub fn list_directory(root: &std::path::Path) -> Result<Vec<FileArrival>> {
    if !root.exists() {
        bail!("Watch root does not exist: {}", root.display());
    }

    let mut arrivals = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata()?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_type = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        arrivals.push(FileArrival {
            file_name,
            file_type,
            size: metadata.len() as i64,
            file_path: path.to_string_lossy().to_string(),
            discovered_at: Utc::now(),
        });
    }

    // Sort for deterministic ordering
    arrivals.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    Ok(arrivals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_all_files_with_metadata() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Contract_A.PDF"), b"alpha").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"some notes").unwrap();

        let arrivals = list_directory(tmp.path()).unwrap();
        assert_eq!(arrivals.len(), 2);

        let pdf = arrivals
            .iter()
            .find(|a| a.file_name == "Contract_A.PDF")
            .unwrap();
        assert_eq!(pdf.file_type, "pdf");
        assert_eq!(pdf.size, 5);
        assert!(pdf.file_path.ends_with("Contract_A.PDF"));
    }

    #[test]
    fn does_not_recurse_into_subdirectories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("top.pdf"), b"top").unwrap();
        fs::create_dir(tmp.path().join("archive")).unwrap();
        fs::write(tmp.path().join("archive").join("nested.pdf"), b"nested").unwrap();

        let arrivals = list_directory(tmp.path()).unwrap();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].file_name, "top.pdf");
    }

    #[test]
    fn no_extension_filtering() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README"), b"no extension").unwrap();

        let arrivals = list_directory(tmp.path()).unwrap();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].file_type, "");
    }

    #[test]
    fn empty_directory_is_a_valid_snapshot() {
        let tmp = TempDir::new().unwrap();
        let arrivals = list_directory(tmp.path()).unwrap();
        assert!(arrivals.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("nope");
        let err = list_directory(&gone).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn ordering_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.pdf"), b"b").unwrap();
        fs::write(tmp.path().join("a.pdf"), b"a").unwrap();
        fs::write(tmp.path().join("c.pdf"), b"c").unwrap();

        let names: Vec<String> = list_directory(tmp.path())
            .unwrap()
            .into_iter()
            .map(|a| a.file_name)
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }
}
