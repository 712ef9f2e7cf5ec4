use axum::{
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use mongodb::{bson::oid::ObjectId, Client};
use tower::ServiceExt;

use coinfolio::models::CurrentUser;
use coinfolio::{config, controllers::alerts_controller, events, services, AppState};

async fn test_state() -> AppState {
    let settings = config::load();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    let (events_tx, _events_rx) =
        tokio::sync::broadcast::channel::<events::NotificationEvent>(16);

    AppState {
        db,
        prices: services::prices::PriceClient::new(settings.price_api_base.clone()),
        legacy: services::legacy_store::LegacyStore::new(std::env::temp_dir()),
        notifications: services::reconciler::NotificationCenter::new(),
        events_tx,
        settings,
    }
}

async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

fn create_request(body: &str) -> Request<axum::body::Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri("/alerts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    req.extensions_mut().insert(CurrentUser { id: ObjectId::new() });
    req
}

#[tokio::test]
async fn create_alert_unauthorized() {
    let state = test_state().await;
    let app = Router::new()
        .route("/alerts", post(alerts_controller::post_create_alert))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/alerts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            r#"{ "coinId": "bitcoin", "symbol": "BTC", "coinName": "Bitcoin", "condition": "above", "targetPrice": 100 }"#,
        ))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_alert_rejects_invalid_condition() {
    let state = test_state().await;
    let app = Router::new()
        .route("/alerts", post(alerts_controller::post_create_alert))
        .with_state(state);

    let req = create_request(
        r#"{ "coinId": "bitcoin", "symbol": "BTC", "coinName": "Bitcoin", "condition": "sideways", "targetPrice": 100 }"#,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("above or below"));
}

#[tokio::test]
async fn create_alert_rejects_nonpositive_target() {
    let state = test_state().await;
    let app = Router::new()
        .route("/alerts", post(alerts_controller::post_create_alert))
        .with_state(state);

    let req = create_request(
        r#"{ "coinId": "bitcoin", "symbol": "BTC", "coinName": "Bitcoin", "condition": "above", "targetPrice": -5 }"#,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("positive number"));
}

#[tokio::test]
async fn create_alert_rejects_missing_coin() {
    let state = test_state().await;
    let app = Router::new()
        .route("/alerts", post(alerts_controller::post_create_alert))
        .with_state(state);

    let req = create_request(
        r#"{ "coinId": "  ", "symbol": "", "coinName": "Bitcoin", "condition": "below", "targetPrice": 100 }"#,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("coinId and symbol are required"));
}

#[tokio::test]
async fn check_price_rejects_nonpositive_price() {
    let state = test_state().await;
    let app = Router::new()
        .route("/alerts/check", post(alerts_controller::post_check_price))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/alerts/check")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{ "coinId": "bitcoin", "price": 0 }"#))
        .unwrap();
    req.extensions_mut().insert(CurrentUser { id: ObjectId::new() });

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("positive number"));
}

#[tokio::test]
async fn delete_alert_rejects_bad_id() {
    let state = test_state().await;
    let app = Router::new()
        .route("/alerts/:id/delete", post(alerts_controller::post_delete_alert))
        .with_state(state);

    let mut req = Request::builder()
        .method("POST")
        .uri("/alerts/zzz/delete")
        .body(axum::body::Body::empty())
        .unwrap();
    req.extensions_mut().insert(CurrentUser { id: ObjectId::new() });

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("bad id"));
}
