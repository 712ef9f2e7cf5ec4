use std::net::SocketAddr;

use mongodb::Client;

use coinfolio::{config, events, routes, services, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = services::db_init::ensure_indexes(&db).await {
        tracing::warn!("ensure_indexes failed: {}", e);
    }

    let (events_tx, _events_rx) =
        tokio::sync::broadcast::channel::<events::NotificationEvent>(128);

    let state = AppState {
        db,
        prices: services::prices::PriceClient::new(settings.price_api_base.clone()),
        legacy: services::legacy_store::LegacyStore::new(&settings.legacy_dir),
        notifications: services::reconciler::NotificationCenter::new(),
        events_tx,
        settings: settings.clone(),
    };

    services::alert_monitor::spawn_price_alert_monitor(state.clone());
    events::spawn_notification_merge(state.clone());

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().expect("bad HOST"),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");
    axum::serve(listener, app).await.expect("server error");
}
