//! Settings file location.
//!
//! Walks up from a starting directory to the nearest directory holding the
//! settings file itself or one of the root indicators. The settings file is
//! placed in that directory, or in the starting directory when nothing
//! matches. Only existence checks are performed.

use std::path::{Component, Path, PathBuf};

use crate::StoreOptions;

/// Resolve the settings file path for `start_dir`.
pub fn resolve_path(start_dir: &Path, opts: &StoreOptions) -> PathBuf {
    if let Some(dir) = &opts.path {
        return absolutize(dir).join(&opts.name);
    }

    let start_dir = absolutize(start_dir);
    let root = find_root(&start_dir, opts).unwrap_or_else(|| start_dir.clone());
    root.join(&opts.name)
}

/// Find the nearest ancestor of `start_dir` (inclusive) containing any of the
/// candidate names. Returns the directory, not the matched entry.
pub fn find_root(start_dir: &Path, opts: &StoreOptions) -> Option<PathBuf> {
    let mut current_dir = start_dir;
    loop {
        for name in opts.candidates() {
            if current_dir.join(name).exists() {
                tracing::debug!(
                    dir = %current_dir.display(),
                    marker = name,
                    "found project root"
                );
                return Some(current_dir.to_path_buf());
            }
        }
        current_dir = current_dir.parent()?;
    }
}

/// Make `path` absolute and fold away `.` and `..` lexically, so that
/// `parent()` only ever yields real ancestors.
fn absolutize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
