use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Buy,
    Sell,
    Delete,
    PriceAlert,
}

impl NotificationKind {
    /// Buy/sell/delete come from direct portfolio actions and are subject to
    /// the `portfolio_updates` setting; price alerts are not.
    pub fn is_portfolio(self) -> bool {
        matches!(self, Self::Buy | Self::Sell | Self::Delete)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub kind: NotificationKind,

    // coin symbol, e.g. "BTC"
    pub coin: String,
    pub quantity: f64,
    pub price: f64,

    pub message: String,

    // unix seconds
    pub created_at: i64,
    pub read: bool,
}
