//! Recursive discovery of input documents.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::DiscoveryConfig;
use crate::error::{GraphError, Result};

/// Collect files under `root` whose extension is configured.
///
/// Files are grouped by extension in configured order (PDFs, then markdown,
/// then text by default) and sorted by path within each group, so discovery
/// order is stable across runs.
pub fn discover_files(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(GraphError::InputNotFound(root.to_path_buf()));
    }

    let mut groups: Vec<Vec<PathBuf>> = vec![Vec::new(); config.extensions.len()];

    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry, config));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !is_file(&entry) {
            continue;
        }

        let Some(extension) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some(group) = config
            .extensions
            .iter()
            .position(|ext| ext.eq_ignore_ascii_case(extension))
        {
            groups[group].push(entry.into_path());
        }
    }

    let counts: Vec<String> = config
        .extensions
        .iter()
        .zip(&groups)
        .map(|(ext, files)| format!("{} {ext}", files.len()))
        .collect();
    let files: Vec<PathBuf> = groups.into_iter().flatten().collect();
    info!("Found {} files ({})", files.len(), counts.join(", "));

    Ok(files)
}

/// Regular files, and symlinks resolving to one when links are not followed.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn is_skipped(entry: &DirEntry, config: &DiscoveryConfig) -> bool {
    // The root itself is never filtered, even when its name is hidden.
    if entry.depth() == 0 {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    if !config.process_hidden && name.starts_with('.') {
        return true;
    }

    entry.file_type().is_dir() && config.skip_directories.iter().any(|dir| *dir == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_groups_by_extension_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("nested")).unwrap();
        std::fs::write(root.join("b.md"), "b").unwrap();
        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::write(root.join("nested/c.pdf"), "c").unwrap();
        std::fs::write(root.join("a.md"), "a").unwrap();
        std::fs::write(root.join("ignored.rs"), "fn main() {}").unwrap();

        let files = discover_files(root, &DiscoveryConfig::default()).unwrap();
        assert_eq!(names(&files, root), vec!["nested/c.pdf", "a.md", "b.md", "a.txt"]);
    }

    #[test]
    fn test_default_walk_keeps_hidden_and_build_dir_names() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("target")).unwrap();
        std::fs::create_dir(root.join("knowledge_graph_output")).unwrap();
        std::fs::write(root.join("target/notes.md"), "x").unwrap();
        std::fs::write(root.join("knowledge_graph_output/stale.md"), "x").unwrap();
        std::fs::write(root.join(".draft.md"), "x").unwrap();
        std::fs::write(root.join("visible.md"), "x").unwrap();

        let files = discover_files(root, &DiscoveryConfig::default()).unwrap();
        assert_eq!(
            names(&files, root),
            vec![".draft.md", "target/notes.md", "visible.md"]
        );
    }

    #[test]
    fn test_opt_in_skips_hidden_and_configured_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join(".obsidian")).unwrap();
        std::fs::create_dir(root.join("node_modules")).unwrap();
        std::fs::write(root.join(".obsidian/workspace.md"), "x").unwrap();
        std::fs::write(root.join("node_modules/readme.md"), "x").unwrap();
        std::fs::write(root.join(".hidden.md"), "x").unwrap();
        std::fs::write(root.join("visible.md"), "x").unwrap();

        let config = DiscoveryConfig {
            process_hidden: false,
            skip_directories: vec!["node_modules".to_string()],
            ..Default::default()
        };
        let files = discover_files(root, &config).unwrap();
        assert_eq!(names(&files, root), vec!["visible.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_discovered() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("research");
        std::fs::create_dir(&root).unwrap();
        let outside = dir.path().join("elsewhere.md");
        std::fs::write(&outside, "x").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("linked.md")).unwrap();

        let files = discover_files(&root, &DiscoveryConfig::default()).unwrap();
        assert_eq!(names(&files, &root), vec!["linked.md"]);
    }

    #[test]
    fn test_extension_match_ignores_case() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("NOTES.MD"), "x").unwrap();

        let files = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = discover_files(&dir.path().join("missing"), &DiscoveryConfig::default())
            .unwrap_err();
        assert!(matches!(err, GraphError::InputNotFound(_)));
    }
}
