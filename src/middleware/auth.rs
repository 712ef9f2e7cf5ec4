use axum::{
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::{models::CurrentUser, AppState};

const USER_ID_HEADER: &str = "x-user-id";

/// Reads the user id the upstream identity layer attached to the request and
/// stores it in the request extensions so handlers can access it.
///
/// Session/token verification happens before traffic reaches this service;
/// a missing or malformed header simply means "no session".
pub async fn inject_current_user(
    State(_state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| ObjectId::parse_str(v.trim()).ok());

    if let Some(id) = user_id {
        req.extensions_mut().insert(CurrentUser { id });
    }

    next.run(req).await
}

fn is_public_path(path: &str) -> bool {
    path == "/health" || path == "/health/db"
}

pub async fn require_auth(
    State(_state): State<AppState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    // inject_current_user already put CurrentUser in extensions => authenticated
    if req.extensions().get::<CurrentUser>().is_some() {
        return next.run(req).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        axum::Json(json!({ "error": "unauthorized" })),
    )
        .into_response()
}
