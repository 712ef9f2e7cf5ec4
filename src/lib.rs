//! Library entrypoint for Coinfolio's notification engine.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

pub mod config;
pub mod models;

// Keep the middleware at crate root because the codebase references it as
// `crate::auth`.
#[path = "middleware/auth.rs"]
pub mod auth;

pub mod events;
pub mod services;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub prices: services::prices::PriceClient,
    pub legacy: services::legacy_store::LegacyStore,
    pub notifications: services::reconciler::NotificationCenter,
    pub events_tx: tokio::sync::broadcast::Sender<events::NotificationEvent>,
}
