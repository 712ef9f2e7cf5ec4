use axum::{routing::post, Router};

use crate::{controllers::session_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/session/start", post(session_controller::post_start))
        .route("/session/end", post(session_controller::post_end))
}
