//! Small shared helpers.
//!
//! - [`path`]: path normalization and containment checks

pub mod path;
