use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Per-user notification preferences, one record per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,

    pub portfolio_updates: bool,
    pub market_trends: bool,
    pub price_alerts_enabled: bool,
}

impl UserSettings {
    pub fn defaults_for(user_id: ObjectId) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            portfolio_updates: true,
            market_trends: true,
            price_alerts_enabled: true,
        }
    }
}
