//! HTTP endpoint handlers
//!
//! Each handler maps one user trigger onto a store operation and answers with
//! the resulting state. Stale ids and unknown categories are no-ops, not errors.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use tracing::info;

use crate::state::{Action, SharedState};
use super::responses::{
    CreateTimerRequest, CreatedResponse, HealthResponse, HistoryResponse, NotificationResponse,
    TimersResponse, ValidationResponse,
};

fn timers_response(state: &SharedState) -> Json<TimersResponse> {
    Json(TimersResponse::from_snapshot(state.snapshot()))
}

fn apply(state: &SharedState, action: Action) -> Json<TimersResponse> {
    state.dispatch(action);
    timers_response(state)
}

/// Handle GET /timers - Timer list with category sections
pub async fn list_timers_handler(State(state): State<SharedState>) -> Json<TimersResponse> {
    timers_response(&state)
}

/// Handle POST /timers - Validate and add a timer
pub async fn create_timer_handler(
    State(state): State<SharedState>,
    Json(request): Json<CreateTimerRequest>,
) -> Response {
    match state.submit(request.into_form()) {
        Ok(timer) => {
            info!("Timer '{}' created via API", timer.name);
            let body = CreatedResponse {
                status: "created".to_string(),
                timestamp: Utc::now(),
                timer,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(errors) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ValidationResponse::new(errors))).into_response()
        }
    }
}

/// Handle POST /timers/:id/toggle - Start or pause one timer
pub async fn toggle_timer_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<TimersResponse> {
    apply(&state, Action::ToggleRunning(id))
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<TimersResponse> {
    apply(&state, Action::ResetTimer(id))
}

/// Handle DELETE /timers/:id
pub async fn delete_timer_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<TimersResponse> {
    apply(&state, Action::DeleteTimer(id))
}

/// Handle POST /categories/:category/start - Start every timer in the category
pub async fn start_category_handler(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Json<TimersResponse> {
    info!("Starting all timers in '{}'", category);
    apply(&state, Action::StartCategory(category))
}

/// Handle POST /categories/:category/pause
pub async fn pause_category_handler(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Json<TimersResponse> {
    info!("Pausing all timers in '{}'", category);
    apply(&state, Action::PauseCategory(category))
}

/// Handle POST /categories/:category/reset
pub async fn reset_category_handler(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Json<TimersResponse> {
    info!("Resetting all timers in '{}'", category);
    apply(&state, Action::ResetCategory(category))
}

/// Handle POST /categories/:category/collapse - Toggle section visibility
pub async fn collapse_category_handler(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Json<TimersResponse> {
    apply(&state, Action::ToggleCategoryCollapsed(category))
}

/// Handle GET /history - Completed timers, oldest first
pub async fn history_handler(State(state): State<SharedState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        timestamp: Utc::now(),
        history: state.history(),
    })
}

/// Handle GET /notification - Pending completion message, if any
pub async fn notification_handler(State(state): State<SharedState>) -> Json<NotificationResponse> {
    Json(NotificationResponse::new(state.notification()))
}

/// Handle DELETE /notification - Acknowledge the completion message
pub async fn dismiss_notification_handler(
    State(state): State<SharedState>,
) -> Json<NotificationResponse> {
    state.dispatch(Action::DismissNotification);
    Json(NotificationResponse::new(None))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let (last_action, last_action_time) = state.get_last_action();
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    })
}
