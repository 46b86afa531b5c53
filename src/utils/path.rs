//! Path normalization utilities.
//!
//! Config paths, watch roots and notify event paths all pass through
//! [`normalize_path`] so they compare equal regardless of symlinks or
//! relative spelling.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Paths that do not exist yet (output dirs, the manifest) fall back to:
/// - the canonical form of the nearest existing ancestor, joined with the rest
/// - or the path joined onto the current directory if nothing exists
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    // Canonicalize the existing prefix so `/tmp/x/out` and `/private/tmp/x/out`
    // (macOS) or symlinked roots compare equal with canonical watch paths.
    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    while let Some(parent) = existing.parent() {
        if let Some(name) = existing.file_name() {
            rest.push(name.to_os_string());
        }
        existing = parent;
        if let Ok(canonical) = existing.canonicalize() {
            let mut out = canonical;
            for name in rest.iter().rev() {
                out.push(name);
            }
            return out;
        }
    }

    absolute
}

/// Whether `path` is `dir` itself or lies below it.
#[inline]
pub fn is_within(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}
