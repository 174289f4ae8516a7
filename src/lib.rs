//! Countdown Shelf - categorized countdown timers with a completion history
//!
//! This library provides the timer store reducer, the one-second tick driver,
//! write-behind persistence to a key-value store and an HTTP surface that maps
//! user triggers onto store operations.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{Action, AppState, TimerStore};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
