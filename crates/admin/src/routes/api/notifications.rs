//! Notification banner API handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{services::Notification, state::AppState};

/// Build the notification API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/notification", get(show).delete(dismiss))
}

/// The notification currently showing, or `null`.
pub async fn show(State(state): State<AppState>) -> Json<Option<Notification>> {
    Json(state.products().notification().await)
}

/// Dismiss the current notification.
pub async fn dismiss(State(state): State<AppState>) -> StatusCode {
    state.products().dismiss_notification().await;
    StatusCode::NO_CONTENT
}
