//! Asset transforms: sources in, in-memory artifacts out.

mod artifact;
mod kind;
mod minify;
mod scan;
mod script;
mod style;

// Types
pub use artifact::{Artifact, VendorFile};
pub use kind::AssetKind;

// Scanning (pure functions)
pub use scan::SourceSet;

// Transforms
pub use script::build_bundle;
pub use style::{browser_targets, build_stylesheet};
