//! Source directory layouts.
//!
//! Older sites kept `sass/` and `js/` at the project root and compiled every
//! stylesheet; current sites keep sources under `src/` with a single
//! `site.scss` entry point. Outputs are the same for both.

use serde::{Deserialize, Serialize};

/// Where sources live when `source`/`include` are not set explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceLayout {
    /// `src/sass/**/site.scss` and `src/js/**/*.js`
    #[default]
    Current,
    /// `sass/**/*.scss` and `js/**/*.js`
    Legacy,
}

impl SourceLayout {
    pub const fn style_source(self) -> &'static str {
        match self {
            Self::Current => "src/sass",
            Self::Legacy => "sass",
        }
    }

    pub const fn style_include(self) -> &'static [&'static str] {
        match self {
            Self::Current => &["**/site.scss"],
            Self::Legacy => &["**/*.scss"],
        }
    }

    pub const fn script_source(self) -> &'static str {
        match self {
            Self::Current => "src/js",
            Self::Legacy => "js",
        }
    }

    pub const fn script_include(self) -> &'static [&'static str] {
        &["**/*.js"]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        }
    }
}
