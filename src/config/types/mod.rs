//! Configuration utility types.
//!
//! | Module   | Purpose                                   |
//! |----------|-------------------------------------------|
//! | `error`  | `ConfigError` and collected diagnostics   |
//! | `field`  | Dotted field paths for diagnostics        |
//! | `handle` | Global hot-swappable config handle        |

mod error;
mod field;
pub mod handle;

pub use error::{ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
pub use handle::{cfg, init_config, reload_config};
