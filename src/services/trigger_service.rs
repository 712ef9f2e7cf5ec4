use std::fmt;

use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};

use crate::{
    events::NotificationEvent,
    models::{AlertRule, Notification, NotificationKind},
    services::messages,
    AppState,
};

#[derive(Debug)]
pub enum TriggerError {
    /// The notification insert was rejected; the rule stays eligible.
    Insert(String),
    /// The notification exists but the rule could not be marked triggered.
    /// The rule stays eligible, so the next sweep may produce a duplicate
    /// notification (bounded at-least-once risk).
    MarkTriggered(String),
    /// A concurrent evaluation already triggered this rule; the duplicate
    /// notification was suppressed.
    AlreadyTriggered,
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerError::Insert(e) => write!(f, "notification insert failed: {e}"),
            TriggerError::MarkTriggered(e) => write!(f, "marking rule triggered failed: {e}"),
            TriggerError::AlreadyTriggered => write!(f, "rule already triggered"),
        }
    }
}

/// Converts a satisfied rule into a notification and retires the rule.
///
/// The rule is only marked triggered after the notification insert succeeds,
/// so a triggered rule always has a notification behind it. The mark step is
/// a conditional update on `is_active: true`; zero matched rows means a
/// concurrent evaluation won the race, and our freshly inserted duplicate is
/// deleted again (best effort).
pub async fn trigger_rule(
    state: &AppState,
    rule: &AlertRule,
    matched_price: f64,
) -> Result<Notification, TriggerError> {
    let notifications = state.db.collection::<Notification>("notifications");
    let rules = state.db.collection::<AlertRule>("price_alerts");
    let now = Utc::now().timestamp();

    let notification = Notification {
        id: ObjectId::new(),
        user_id: rule.user_id,
        kind: NotificationKind::PriceAlert,
        coin: rule.symbol.clone(),
        quantity: 0.0,
        price: matched_price,
        message: messages::alert_message(rule, matched_price),
        created_at: now,
        read: false,
    };

    notifications
        .insert_one(&notification, None)
        .await
        .map_err(|e| TriggerError::Insert(e.to_string()))?;

    let res = rules
        .update_one(
            doc! { "_id": rule.id, "is_active": true },
            doc! { "$set": { "is_active": false, "triggered_at": now } },
            None,
        )
        .await
        .map_err(|e| TriggerError::MarkTriggered(e.to_string()))?;

    if res.matched_count == 0 {
        let _ = notifications
            .delete_one(doc! { "_id": notification.id }, None)
            .await;
        return Err(TriggerError::AlreadyTriggered);
    }

    // Committed: publish to the push channel and reflect into the local log.
    // The merge task will see the broadcast echo too; the log dedupes.
    let _ = state
        .events_tx
        .send(NotificationEvent::new(notification.clone()));
    state
        .notifications
        .append(notification.user_id, notification.clone())
        .await;

    Ok(notification)
}
