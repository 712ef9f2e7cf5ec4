use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,

    // price-feed identifier, e.g. "bitcoin"
    pub coin_id: String,
    pub symbol: String,
    pub coin_name: String,

    pub condition: AlertCondition,
    pub target_price: f64,

    pub created_at: i64,

    pub is_active: bool,
    pub triggered_at: Option<i64>,
}

impl AlertRule {
    /// A rule is evaluated only while active and never-triggered. Triggering
    /// is one-shot; re-arming means creating a new rule.
    pub fn is_eligible(&self) -> bool {
        self.is_active && self.triggered_at.is_none()
    }
}
