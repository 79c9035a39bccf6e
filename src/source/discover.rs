//! Folder discovery for batch inputs

use std::path::{Path, PathBuf};

/// Extensions accepted when discovering files from a folder
pub const SUPPORTED_EXTS: &[&str] = &["pdf"];

/// Collect supported files under `folder`.
///
/// Extensions match case-insensitively. Entries that cannot be read are
/// skipped. The result is sorted by path so batch order is deterministic.
pub fn supported_files(folder: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_supported(folder, recursive, &mut files);
    files.sort();
    files
}

fn collect_supported(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();

        if path.is_dir() {
            if recursive {
                collect_supported(&path, recursive, files);
            }
        } else if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| SUPPORTED_EXTS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}
