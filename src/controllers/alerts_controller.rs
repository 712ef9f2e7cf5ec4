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
    models::{alert::AlertCondition, CurrentUser},
    services::alerts_service,
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

// GET /alerts
pub async fn get_alerts(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match alerts_service::list_user_alerts(&state, u.id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct CreateAlertBody {
    #[serde(rename = "coinId")]
    pub coin_id: String,
    pub symbol: String,

    #[serde(rename = "coinName")]
    pub coin_name: String,

    pub condition: String,

    #[serde(rename = "targetPrice")]
    pub target_price: f64,
}

// POST /alerts
pub async fn post_create_alert(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<CreateAlertBody>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let condition = match body.condition.to_lowercase().as_str() {
        "above" => AlertCondition::Above,
        "below" => AlertCondition::Below,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "condition must be above or below" })),
            )
                .into_response();
        }
    };

    if !body.target_price.is_finite() || body.target_price <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "target price must be a positive number" })),
        )
            .into_response();
    }

    let coin_id = body.coin_id.trim();
    let symbol = body.symbol.trim();
    if coin_id.is_empty() || symbol.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "coinId and symbol are required" })),
        )
            .into_response();
    }

    match alerts_service::create_alert(
        &state,
        u.id,
        coin_id,
        symbol,
        body.coin_name.trim(),
        condition,
        body.target_price,
    )
    .await
    {
        Ok(rule) => (StatusCode::CREATED, Json(rule)).into_response(),
        Err(e) => db_error(e),
    }
}

#[derive(Deserialize)]
pub struct CheckPriceBody {
    #[serde(rename = "coinId")]
    pub coin_id: String,
    pub price: f64,
}

// POST /alerts/check
//
// Single-coin evaluation for callers that learn one fresh price out of
// band (e.g. a detail view already polling that coin). Routes through the
// same predicate as the periodic sweep.
pub async fn post_check_price(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<CheckPriceBody>,
) -> Response {
    if user.is_none() {
        return unauthorized();
    }

    let coin_id = body.coin_id.trim().to_lowercase();
    if coin_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "coinId is required" })),
        )
            .into_response();
    }
    if !body.price.is_finite() || body.price <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "price must be a positive number" })),
        )
            .into_response();
    }

    match crate::services::alert_monitor::check_coin_price(&state, &coin_id, body.price).await {
        Ok(fired) => (StatusCode::OK, Json(json!({ "fired": fired }))).into_response(),
        Err(e) => db_error(e),
    }
}

// POST /alerts/:id/delete
pub async fn post_delete_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad id" }))).into_response();
        }
    };

    match alerts_service::delete_alert(&state, u.id, oid).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "deleted": true }))).into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, Json(json!({ "deleted": false }))).into_response(),
        Err(e) => db_error(e),
    }
}
