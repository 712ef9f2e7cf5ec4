use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub price_api_base: String,
    pub alert_poll_secs: u64,

    // directory holding pre-migration JSON snapshots
    pub legacy_dir: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "coinfolio".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let price_api_base = env::var("PRICE_API_BASE")
        .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string());

    let alert_poll_secs = env::var("ALERT_POLL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30);

    let legacy_dir = env::var("LEGACY_DIR").unwrap_or_else(|_| "legacy".to_string());

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        price_api_base,
        alert_poll_secs,
        legacy_dir,
    }
}
