use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Default name of the OCR transcript stored next to each archived PDF.
pub const RESULT_FILE: &str = "result.txt";

/// Find every OCR transcript in a filed archive.
///
/// Expected directory layout:
///   {root}/{YYYY}/{MM}/{DD}/{title}/result.txt
///
/// The layout is not enforced; any file named `file_name` at any depth is
/// returned. Unreadable directory entries are logged and skipped. Paths
/// are sorted so datasets come out in a stable order.
pub fn scan_archive(root: &Path, file_name: &str) -> Vec<PathBuf> {
    let mut results: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable archive entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str() == Some(file_name))
        .map(|e| e.into_path())
        .collect();

    results.sort();
    tracing::info!(root = %root.display(), files = results.len(), "scanned archive");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_finds_result_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for rel in [
            "2016/01/20/faktura/result.txt",
            "2016/01/20/faktura/result.pdf",
            "2012/01/28/printer ink/result.txt",
            "2012/01/28/printer ink/notes.txt",
        ] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "x").unwrap();
        }

        let found = scan_archive(root, RESULT_FILE);
        assert_eq!(
            found,
            vec![
                root.join("2012/01/28/printer ink/result.txt"),
                root.join("2016/01/20/faktura/result.txt"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_archive(&dir.path().join("nope"), RESULT_FILE).is_empty());
    }
}
