//! Notebook file enumeration.

use crate::constants;
use std::fs;
use std::path::{Path, PathBuf};

/// Whether `path` names a notebook file (by extension).
pub fn is_notebook(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(constants::NOTEBOOK_EXT)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Path of `path` relative to `root`, for display and ordering.
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Sorts lexically by the path string relative to `root`.
fn sort_relative(root: &Path, paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| relative(root, p));
}

/// Non-hidden notebooks directly inside `dir`. A missing directory yields none.
fn notebooks_in(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_notebook(&path) && !is_hidden(&path) {
                found.push(path);
            }
        }
    }
    found
}

/// Notebooks selected for batch execution.
///
/// With `directory`, every notebook directly inside `<root>/<directory>`.
/// Without it, every notebook one level below a top-level directory whose
/// name starts with a lowercase ASCII letter. Sorted by relative path.
pub fn run_targets(root: &Path, directory: Option<&str>) -> Vec<PathBuf> {
    let mut targets = match directory {
        Some(dir) => notebooks_in(&root.join(dir)),
        None => {
            let mut all = Vec::new();
            if let Ok(entries) = fs::read_dir(root) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    let starts_lower = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .and_then(|n| n.chars().next())
                        .is_some_and(|c| c.is_ascii_lowercase());
                    if path.is_dir() && starts_lower {
                        all.extend(notebooks_in(&path));
                    }
                }
            }
            all
        }
    };
    sort_relative(root, &mut targets);
    targets
}

/// Every notebook below `root`, at any depth, sorted by relative path.
///
/// Hidden directories, directories named in `exclude_dirs`, and symlinked
/// directories are not descended into. Symlinked notebook files are kept.
pub fn all_notebooks(root: &Path, exclude_dirs: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            log::debug!(
                "event=read_dir module=discover status=skipped path={}",
                dir.display()
            );
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            // file_type does not follow symlinks, so a link back to an
            // ancestor is never walked
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                let excluded = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| exclude_dirs.iter().any(|x| x == n));
                if !excluded && !is_hidden(&path) {
                    pending.push(path);
                }
            } else if path.is_file() && is_notebook(&path) {
                found.push(path);
            }
        }
    }

    sort_relative(root, &mut found);
    found
}

/// Keeps the paths whose first component below `root` is `directory`.
pub fn filter_by_directory(root: &Path, paths: Vec<PathBuf>, directory: &str) -> Vec<PathBuf> {
    let wanted = Path::new(directory.trim_end_matches('/'));
    paths
        .into_iter()
        .filter(|p| p.strip_prefix(root).is_ok_and(|rel| rel.starts_with(wanted)))
        .collect()
}
