//! State management module
//!
//! This module contains the timer store reducer, its data types and the
//! shared application state that serializes access to it.

pub mod action;
pub mod app_state;
pub mod form;
pub mod grouping;
pub mod store;
pub mod timer;

// Re-export main types
pub use action::Action;
pub use app_state::{AppState, SharedState, StoreSnapshot};
pub use form::{FormErrors, NewTimer, TimerForm};
pub use grouping::{grouped_by_category, CategoryGroup};
pub use store::{Completion, TimerStore};
pub use timer::{CompletionRecord, IdGenerator, Timer, TimerId};
