//! Asset kind definitions.

use std::fmt;

/// The two build targets; each owns one output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    /// Sass sources compiled into one stylesheet.
    Css,
    /// Scripts concatenated into one bundle.
    Js,
}

impl AssetKind {
    pub const ALL: [Self; 2] = [Self::Css, Self::Js];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    /// Kind of an output file, judged by its extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name.rsplit_once('.')?.1 {
            "css" => Some(Self::Css),
            "js" => Some(Self::Js),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
