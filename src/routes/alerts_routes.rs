use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::alerts_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/alerts", get(alerts_controller::get_alerts))
        .route("/alerts", post(alerts_controller::post_create_alert))
        .route("/alerts/check", post(alerts_controller::post_check_price))
        .route("/alerts/:id/delete", post(alerts_controller::post_delete_alert))
}
