//! Configuration section definitions.
//!
//! | Module  | TOML Section       | Purpose                              |
//! |---------|--------------------|--------------------------------------|
//! | `build` | `[build]`          | Switches, layout, targets, manifest  |

pub mod build;

pub use build::{BuildSectionConfig, CssConfig, JsConfig, SourceLayout};
