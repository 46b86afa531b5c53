//! Build error types.

use crate::asset::AssetKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single target (CSS or JS) failed.
///
/// Every variant aborts only the target that produced it; the other target
/// and previously written output are left alone.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Malformed stylesheet or script.
    #[error("syntax error in {}:\n{message}", path.display())]
    Syntax { path: PathBuf, message: String },

    /// Permission or missing-path problem while reading, clearing or writing.
    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hashing produced no usable file name. Not expected with valid config.
    #[error("hash computation failed: {0}")]
    Hash(String),

    /// The manifest could not be read, locked or written.
    #[error("manifest `{}`: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// Nothing matched the target's include globs.
    #[error("no {kind} sources matched under `{}`", root.display())]
    NoSources { kind: AssetKind, root: PathBuf },

    /// A source glob failed to compile.
    #[error("invalid pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

impl BuildError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn syntax(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// One-line summary for the watch status line.
    pub fn summary(&self) -> String {
        match self {
            Self::Syntax { path, .. } => format!("syntax error in {}", path.display()),
            Self::Io { path, source } => format!("{}: {}", path.display(), source),
            other => other.to_string(),
        }
    }
}

/// Result alias for target-level operations.
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_syntax_display_names_file() {
        let err = BuildError::syntax("src/sass/site.scss", "expected \"}\".");
        let display = err.to_string();
        assert!(display.contains("src/sass/site.scss"));
        assert!(display.contains("expected"));
        assert_eq!(err.summary(), "syntax error in src/sass/site.scss");
    }

    #[test]
    fn test_io_summary_includes_cause() {
        let err = BuildError::io(
            "static/css",
            Error::new(ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(err.summary().contains("permission denied"));
        assert!(err.to_string().contains("static/css"));
    }

    #[test]
    fn test_no_sources_display() {
        let err = BuildError::NoSources {
            kind: AssetKind::Css,
            root: PathBuf::from("src/sass"),
        };
        assert_eq!(err.to_string(), "no css sources matched under `src/sass`");
    }
}
