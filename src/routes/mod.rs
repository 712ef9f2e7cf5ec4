use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::{controllers::system_controller, AppState};

pub mod system_routes;
pub mod notifications_routes;
pub mod alerts_routes;
pub mod settings_routes;
pub mod session_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = system_routes::add_routes(router);
    let router = notifications_routes::add_routes(router);
    let router = alerts_routes::add_routes(router);
    let router = settings_routes::add_routes(router);
    let router = session_routes::add_routes(router);

    router
        .fallback(system_controller::not_found)
        .layer(from_fn_with_state(state.clone(), crate::auth::require_auth))
        .layer(from_fn_with_state(
            state.clone(),
            crate::auth::inject_current_user,
        ))
        .with_state(state)
}
