use axum::{routing::get, Router};

use crate::{controllers::system_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/health", get(system_controller::health))
        .route("/health/db", get(system_controller::health_db))
}
