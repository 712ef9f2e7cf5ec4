use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::{
    events::NotificationEvent,
    models::{Notification, NotificationKind},
    services::{messages, migration_service, reconciler::MAX_NOTIFICATIONS, settings_service},
    AppState,
};

/// Records a direct portfolio action (buy/sell/delete) as a notification.
///
/// Returns `Ok(None)` when the user's settings gate the event out; that is
/// a policy decision, not a failure. On insert the row is pushed onto the
/// broadcast channel and reflected into the session log.
pub async fn record_event(
    state: &AppState,
    user_id: ObjectId,
    kind: NotificationKind,
    coin: &str,
    quantity: f64,
    price: f64,
) -> Result<Option<Notification>, String> {
    // A settings read failure falls back to the gate's permissive default
    // rather than dropping the event.
    let settings = settings_service::load(state, user_id).await.ok().flatten();
    if !settings_service::allows(settings.as_ref(), kind) {
        return Ok(None);
    }

    let coin = coin.to_uppercase();
    let notification = Notification {
        id: ObjectId::new(),
        user_id,
        kind,
        message: messages::portfolio_message(kind, &coin, quantity, price),
        coin,
        quantity,
        price,
        created_at: Utc::now().timestamp(),
        read: false,
    };

    let col = state.db.collection::<Notification>("notifications");
    col.insert_one(&notification, None)
        .await
        .map_err(|e| e.to_string())?;

    let _ = state
        .events_tx
        .send(NotificationEvent::new(notification.clone()));
    state
        .notifications
        .append(user_id, notification.clone())
        .await;

    Ok(Some(notification))
}

/// Loads the user's most recent notifications from the store and replaces
/// the session log wholesale.
pub async fn reload(state: &AppState, user_id: ObjectId) -> Result<Vec<Notification>, String> {
    let col = state.db.collection::<Notification>("notifications");

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .limit(MAX_NOTIFICATIONS as i64)
        .build();

    let mut cursor = col
        .find(doc! { "user_id": user_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<Notification> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    state.notifications.replace(user_id, items.clone()).await;

    Ok(items)
}

/// Session start: run the one-time legacy migration, then load the log.
/// Returns (migrated_anything, notifications).
pub async fn start_session(
    state: &AppState,
    user_id: ObjectId,
) -> Result<(bool, Vec<Notification>), String> {
    let migrated = migration_service::migrate_if_needed(state, user_id).await?;
    let items = reload(state, user_id).await?;
    Ok((migrated, items))
}

/// Session end: drop the in-memory log. The store is untouched.
pub async fn end_session(state: &AppState, user_id: ObjectId) {
    state.notifications.end_session(user_id).await;
}

/// Write-then-reflect: the local entry flips only after the store accepted
/// the update. Returns whether a row was actually updated.
pub async fn mark_as_read(
    state: &AppState,
    user_id: ObjectId,
    id: ObjectId,
) -> Result<bool, String> {
    let col = state.db.collection::<Notification>("notifications");

    let res = col
        .update_one(
            doc! { "_id": id, "user_id": user_id },
            doc! { "$set": { "read": true } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    if res.matched_count == 0 {
        return Ok(false);
    }

    state.notifications.mark_read(user_id, id).await;
    Ok(true)
}

pub async fn mark_all_as_read(state: &AppState, user_id: ObjectId) -> Result<u64, String> {
    let col = state.db.collection::<Notification>("notifications");

    let res = col
        .update_many(
            doc! { "user_id": user_id, "read": false },
            doc! { "$set": { "read": true } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    state.notifications.mark_all_read(user_id).await;
    Ok(res.modified_count)
}

pub async fn clear_all(state: &AppState, user_id: ObjectId) -> Result<u64, String> {
    let col = state.db.collection::<Notification>("notifications");

    let res = col
        .delete_many(doc! { "user_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())?;

    state.notifications.clear(user_id).await;
    Ok(res.deleted_count)
}
