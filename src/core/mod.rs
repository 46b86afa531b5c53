//! Process lifecycle state shared across commands.

mod state;

pub use state::{is_shutdown, register_shutdown_signal, setup_shutdown_handler};
