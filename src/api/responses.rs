//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{CompletionRecord, FormErrors, StoreSnapshot, Timer, TimerForm};

/// One category section of the timer list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub category: String,
    pub collapsed: bool,
    pub timers: Vec<TimerView>,
}

/// A timer plus its display progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub progress_percent: u8,
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        Self {
            progress_percent: timer.progress_percent(),
            timer,
        }
    }
}

/// Response for the timer list and every operation on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timestamp: DateTime<Utc>,
    pub timers: Vec<Timer>,
    pub sections: Vec<Section>,
    pub form: TimerForm,
    pub notification: Option<String>,
}

impl TimersResponse {
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let sections = crate::state::grouped_by_category(&snapshot.timers)
            .into_iter()
            .map(|group| {
                let collapsed = snapshot
                    .collapsed
                    .iter()
                    .any(|(category, flag)| *flag && *category == group.category);
                Section {
                    category: group.category,
                    collapsed,
                    timers: group.timers.into_iter().map(TimerView::from).collect(),
                }
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            timers: snapshot.timers,
            sections,
            form: snapshot.form,
            notification: snapshot.notification,
        }
    }
}

/// Request body for creating a timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTimerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Accepts either a JSON number or text as typed
    #[serde(default)]
    pub duration: serde_json::Value,
}

impl CreateTimerRequest {
    pub fn into_form(self) -> TimerForm {
        let duration = match self.duration {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        TimerForm::new(self.name, duration, self.category)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub timer: Timer,
}

/// Field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub status: String,
    pub message: String,
    pub errors: FormErrors,
}

impl ValidationResponse {
    pub fn new(errors: FormErrors) -> Self {
        Self {
            status: "error".to_string(),
            message: errors.to_string(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub timestamp: DateTime<Utc>,
    pub history: Vec<CompletionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub visible: bool,
    pub timer_name: Option<String>,
    pub message: Option<String>,
}

impl NotificationResponse {
    pub fn new(timer_name: Option<String>) -> Self {
        Self {
            visible: timer_name.is_some(),
            message: timer_name.as_ref().map(|name| format!("Timer \"{}\" completed!", name)),
            timer_name,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}
