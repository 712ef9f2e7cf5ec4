use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::settings_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/settings", get(settings_controller::get_settings))
        .route("/settings", post(settings_controller::post_settings))
}
