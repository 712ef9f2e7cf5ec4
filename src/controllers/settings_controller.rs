use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    models::CurrentUser,
    services::settings_service::{self, SettingsPatch},
    AppState,
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized" })),
    )
        .into_response()
}

fn db_error(e: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("db error: {e}") })),
    )
        .into_response()
}

// GET /settings
pub async fn get_settings(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match settings_service::get_or_create(&state, u.id).await {
        Ok(s) => (StatusCode::OK, Json(s)).into_response(),
        Err(e) => db_error(e),
    }
}

// POST /settings
pub async fn post_settings(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(patch): Json<SettingsPatch>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match settings_service::update(&state, u.id, patch).await {
        Ok(s) => (StatusCode::OK, Json(s)).into_response(),
        Err(e) => db_error(e),
    }
}
