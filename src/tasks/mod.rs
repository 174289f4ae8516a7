//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod completion_log;
pub mod persistence_sync;
pub mod tick_driver;

// Re-export main types
pub use completion_log::spawn_completion_log;
pub use persistence_sync::{persist_now, PersistenceSync};
pub use tick_driver::TickDriver;
