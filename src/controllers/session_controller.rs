use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{models::CurrentUser, services::notification_service, AppState};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized" })),
    )
        .into_response()
}

// POST /session/start
//
// Called by the identity layer once a session becomes active: runs the
// one-time legacy migration and loads the session log wholesale.
pub async fn post_start(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match notification_service::start_session(&state, u.id).await {
        Ok((migrated, items)) => (
            StatusCode::OK,
            Json(json!({
                "migrated": migrated,
                "notifications": items,
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("db error: {e}") })),
        )
            .into_response(),
    }
}

// POST /session/end
pub async fn post_end(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    notification_service::end_session(&state, u.id).await;
    (StatusCode::OK, Json(json!({ "ended": true }))).into_response()
}
