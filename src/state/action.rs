//! Operations accepted by the timer store

use super::{CompletionRecord, Timer, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddTimer { name: String, category: String, duration: u64 },
    Tick(TimerId),
    ToggleRunning(TimerId),
    ResetTimer(TimerId),
    DeleteTimer(TimerId),
    CompleteTimer(TimerId),
    StartCategory(String),
    PauseCategory(String),
    ResetCategory(String),
    ToggleCategoryCollapsed(String),
    LoadTimers(Vec<Timer>),
    LoadHistory(Vec<CompletionRecord>),
    SetFormName(String),
    SetFormDuration(String),
    SetFormCategory(String),
    SetAttemptedSubmit(bool),
    DismissNotification,
}

impl Action {
    /// Short name used in logs and last-action tracking
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddTimer { .. } => "add-timer",
            Action::Tick(_) => "tick",
            Action::ToggleRunning(_) => "toggle-running",
            Action::ResetTimer(_) => "reset-timer",
            Action::DeleteTimer(_) => "delete-timer",
            Action::CompleteTimer(_) => "complete-timer",
            Action::StartCategory(_) => "start-category",
            Action::PauseCategory(_) => "pause-category",
            Action::ResetCategory(_) => "reset-category",
            Action::ToggleCategoryCollapsed(_) => "toggle-category-collapsed",
            Action::LoadTimers(_) => "load-timers",
            Action::LoadHistory(_) => "load-history",
            Action::SetFormName(_) => "set-form-name",
            Action::SetFormDuration(_) => "set-form-duration",
            Action::SetFormCategory(_) => "set-form-category",
            Action::SetAttemptedSubmit(_) => "set-attempted-submit",
            Action::DismissNotification => "dismiss-notification",
        }
    }
}
