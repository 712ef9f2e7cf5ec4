pub mod prices;
pub mod db_init;
pub mod legacy_store;

pub mod messages;
pub mod reconciler;
pub mod alert_evaluator;
pub mod alerts_service;
pub mod trigger_service;
pub mod alert_monitor;
pub mod notification_service;
pub mod settings_service;
pub mod migration_service;
