/*!
 * Utility functions for filizer
 */

use std::path::Path;

use glob_match::glob_match;
use once_cell::sync::Lazy;
use walkdir::WalkDir;

use crate::types::MARKER_FILE_NAME;

/// Count regular files under `dir` that survive exclusion, for progress tracking
pub fn count_files(dir: &Path, excludes: &[String]) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !is_excluded(e.path().strip_prefix(dir).unwrap_or(e.path()), excludes)
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() != MARKER_FILE_NAME)
        .count() as u64
}

/// Whether any segment of `rel_path` matches a default or user pattern
pub fn is_excluded(rel_path: &Path, patterns: &[String]) -> bool {
    rel_path.components().any(|component| {
        let segment = component.as_os_str().to_string_lossy();
        DEFAULT_IGNORE.iter().any(|p| glob_match(p, &segment))
            || patterns.iter().any(|p| glob_match(p, &segment))
    })
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Patterns that are never inventoried
pub static DEFAULT_IGNORE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        ".bzr",
        // OS Files
        ".DS_Store",
        "._*",
        "Thumbs.db",
        "desktop.ini",
        "ehthumbs.db",
        ".directory",
        ".Spotlight-V100",
        ".Trashes",
        ".fseventsd",
        "$RECYCLE.BIN",
        "System Volume Information",
        // Editor scratch files
        "*.swp",
        "*.swo",
        "*~",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_is_excluded_matches_any_segment() {
        let patterns = vec!["node_modules".to_string(), "*.tmp".to_string()];
        assert!(is_excluded(&PathBuf::from("a/node_modules/b.js"), &patterns));
        assert!(is_excluded(&PathBuf::from("a/b/c.tmp"), &patterns));
        assert!(is_excluded(&PathBuf::from(".git/config"), &[]));
        assert!(is_excluded(&PathBuf::from("photos/.DS_Store"), &[]));
        assert!(!is_excluded(&PathBuf::from("a/b/c.txt"), &patterns));
    }

    #[test]
    fn test_count_files_skips_excluded_and_markers() -> std::io::Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("keep/nested"))?;
        fs::create_dir_all(root.join("skip"))?;
        fs::write(root.join("keep/a.txt"), "a")?;
        fs::write(root.join("keep/nested/b.txt"), "b")?;
        fs::write(root.join("keep").join(MARKER_FILE_NAME), "")?;
        fs::write(root.join("skip/c.txt"), "c")?;

        assert_eq!(count_files(root, &["skip".to_string()]), 2);
        assert_eq!(count_files(root, &[]), 3);
        Ok(())
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}
