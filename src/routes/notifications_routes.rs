use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::notifications_controller, events, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/notifications", get(notifications_controller::get_notifications))
        .route("/notifications", post(notifications_controller::post_record_event))
        .route("/notifications/unread-count", get(notifications_controller::get_unread_count))
        .route("/notifications/:id/read", post(notifications_controller::post_mark_read))
        .route("/notifications/read-all", post(notifications_controller::post_mark_all_read))
        .route("/notifications/clear", post(notifications_controller::post_clear))
        .route("/events", get(events::sse_notifications))
}
