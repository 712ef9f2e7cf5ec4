use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::{
    models::{alert::AlertCondition, AlertRule},
    AppState,
};

pub async fn list_user_alerts(
    state: &AppState,
    user_id: ObjectId,
) -> Result<Vec<AlertRule>, String> {
    let rules = state.db.collection::<AlertRule>("price_alerts");

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = rules
        .find(doc! { "user_id": user_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<AlertRule> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    Ok(items)
}

pub async fn create_alert(
    state: &AppState,
    user_id: ObjectId,
    coin_id: &str,
    symbol: &str,
    coin_name: &str,
    condition: AlertCondition,
    target_price: f64,
) -> Result<AlertRule, String> {
    let rules = state.db.collection::<AlertRule>("price_alerts");

    let rule = AlertRule {
        id: ObjectId::new(),
        user_id,
        coin_id: coin_id.to_lowercase(),
        symbol: symbol.to_uppercase(),
        coin_name: coin_name.to_string(),
        condition,
        target_price,
        created_at: Utc::now().timestamp(),
        is_active: true,
        triggered_at: None,
    };

    rules
        .insert_one(&rule, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(rule)
}

pub async fn delete_alert(
    state: &AppState,
    user_id: ObjectId,
    alert_id: ObjectId,
) -> Result<bool, String> {
    let rules = state.db.collection::<AlertRule>("price_alerts");

    let res = rules
        .delete_one(doc! { "_id": alert_id, "user_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.deleted_count > 0)
}
