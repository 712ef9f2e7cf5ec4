use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::{CurrentUser, NotificationKind},
    services::notification_service,
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

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
}

// GET /notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    // Read-through: an empty session log means no session reload has run
    // yet, so fall back to the store once.
    if !state.notifications.has_log(u.id).await {
        if let Err(e) = notification_service::reload(&state, u.id).await {
            return db_error(e);
        }
    }

    let items = state.notifications.snapshot(u.id).await;
    (StatusCode::OK, Json(items)).into_response()
}

// GET /notifications/unread-count
pub async fn get_unread_count(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let unread = state.notifications.unread_count(u.id).await;
    (StatusCode::OK, Json(json!({ "unread": unread }))).into_response()
}

#[derive(Deserialize)]
pub struct RecordEventBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub coin: String,

    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
}

// POST /notifications
//
// Direct-action path: buy/sell/delete events reported by the portfolio
// layer. Price-alert notifications only ever come from the trigger path.
pub async fn post_record_event(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<RecordEventBody>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let kind = match body.kind.to_lowercase().as_str() {
        "buy" => NotificationKind::Buy,
        "sell" => NotificationKind::Sell,
        "delete" => NotificationKind::Delete,
        "price_alert" => return bad_request("price_alert notifications are created by the alert engine"),
        _ => return bad_request("type must be one of buy, sell, delete"),
    };

    let coin = body.coin.trim();
    if coin.is_empty() {
        return bad_request("coin is required");
    }
    if !body.quantity.is_finite() || !body.price.is_finite() {
        return bad_request("quantity and price must be finite numbers");
    }

    match notification_service::record_event(&state, u.id, kind, coin, body.quantity, body.price)
        .await
    {
        Ok(Some(n)) => (StatusCode::CREATED, Json(n)).into_response(),
        // gated out by settings: accepted, nothing created
        Ok(None) => (StatusCode::OK, Json(json!({ "created": false }))).into_response(),
        Err(e) => db_error(e),
    }
}

// POST /notifications/:id/read
pub async fn post_mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return bad_request("bad id"),
    };

    match notification_service::mark_as_read(&state, u.id, oid).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "updated": true }))).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "updated": false })),
        )
            .into_response(),
        Err(e) => db_error(e),
    }
}

// POST /notifications/read-all
pub async fn post_mark_all_read(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match notification_service::mark_all_as_read(&state, u.id).await {
        Ok(updated) => (StatusCode::OK, Json(json!({ "updated": updated }))).into_response(),
        Err(e) => db_error(e),
    }
}

// POST /notifications/clear
pub async fn post_clear(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match notification_service::clear_all(&state, u.id).await {
        Ok(deleted) => (StatusCode::OK, Json(json!({ "deleted": deleted }))).into_response(),
        Err(e) => db_error(e),
    }
}
