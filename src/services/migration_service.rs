use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::{
    models::{Notification, NotificationKind, UserSettings},
    services::{legacy_store, reconciler::MAX_NOTIFICATIONS},
    AppState,
};

/// Notification shape used by the pre-migration local snapshots. Ids were
/// client-generated strings; fresh ObjectIds are minted on import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyNotification {
    pub kind: NotificationKind,
    pub coin: String,

    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,

    pub message: String,
    pub created_at: i64,

    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySettings {
    #[serde(default = "default_true")]
    pub portfolio_updates: bool,
    #[serde(default = "default_true")]
    pub market_trends: bool,
    #[serde(default = "default_true")]
    pub price_alerts_enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    /// Nothing in the snapshot: leave everything alone.
    Skip,
    /// The store already has records for this user. Any record counts as
    /// proof a prior migration completed (or the user organically has data,
    /// which equally means "do not import"); only the snapshot is deleted.
    DeleteSnapshotOnly,
    /// Empty store, non-empty snapshot: import, then delete the snapshot.
    Import,
}

pub fn plan(snapshot_len: usize, store_has_records: bool) -> MigrationAction {
    if snapshot_len == 0 {
        MigrationAction::Skip
    } else if store_has_records {
        MigrationAction::DeleteSnapshotOnly
    } else {
        MigrationAction::Import
    }
}

/// Keeps the most recent entries, newest first, within the log cap.
pub fn cap_most_recent(mut items: Vec<LegacyNotification>) -> Vec<LegacyNotification> {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(MAX_NOTIFICATIONS);
    items
}

fn import_record(user_id: ObjectId, legacy: LegacyNotification) -> Notification {
    Notification {
        id: ObjectId::new(),
        user_id,
        kind: legacy.kind,
        coin: legacy.coin,
        quantity: legacy.quantity,
        price: legacy.price,
        message: legacy.message,
        created_at: legacy.created_at,
        read: legacy.read,
    }
}

/// Moves a user's legacy local snapshots into the store, at most once.
/// Idempotent and safe to call every session start. Returns whether any
/// records were imported this call.
///
/// The snapshot is only deleted after its content is safely in the store
/// (or known to be unnecessary); a failed insert leaves the snapshot in
/// place for the next attempt.
pub async fn migrate_if_needed(state: &AppState, user_id: ObjectId) -> Result<bool, String> {
    let imported_notifications = migrate_notifications(state, user_id).await?;
    let imported_settings = migrate_settings(state, user_id).await?;

    Ok(imported_notifications || imported_settings)
}

async fn migrate_notifications(state: &AppState, user_id: ObjectId) -> Result<bool, String> {
    let key = legacy_store::notifications_key(user_id);
    let snapshot: Vec<LegacyNotification> = state.legacy.get_or(&key, Vec::new());

    let col = state.db.collection::<Notification>("notifications");

    let store_has_records = if snapshot.is_empty() {
        false // plan() short-circuits; skip the store round-trip
    } else {
        col.find_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| e.to_string())?
            .is_some()
    };

    match plan(snapshot.len(), store_has_records) {
        MigrationAction::Skip => Ok(false),
        MigrationAction::DeleteSnapshotOnly => {
            state.legacy.remove(&key);
            Ok(false)
        }
        MigrationAction::Import => {
            let records: Vec<Notification> = cap_most_recent(snapshot)
                .into_iter()
                .map(|l| import_record(user_id, l))
                .collect();

            col.insert_many(&records, None)
                .await
                .map_err(|e| e.to_string())?;

            state.legacy.remove(&key);
            tracing::info!(
                user = %user_id.to_hex(),
                count = records.len(),
                "imported legacy notification snapshot"
            );
            Ok(true)
        }
    }
}

async fn migrate_settings(state: &AppState, user_id: ObjectId) -> Result<bool, String> {
    let key = legacy_store::settings_key(user_id);
    let Some(legacy) = state.legacy.get::<LegacySettings>(&key) else {
        return Ok(false);
    };

    let col = state.db.collection::<UserSettings>("user_settings");

    // A user-scoped settings record existing means migrated (or created
    // organically); either way the snapshot is obsolete.
    let existing = col
        .find_one(doc! { "user_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())?;

    if existing.is_some() {
        state.legacy.remove(&key);
        return Ok(false);
    }

    let settings = UserSettings {
        id: ObjectId::new(),
        user_id,
        portfolio_updates: legacy.portfolio_updates,
        market_trends: legacy.market_trends,
        price_alerts_enabled: legacy.price_alerts_enabled,
    };

    col.insert_one(&settings, None)
        .await
        .map_err(|e| e.to_string())?;

    state.legacy.remove(&key);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(created_at: i64) -> LegacyNotification {
        LegacyNotification {
            kind: NotificationKind::Buy,
            coin: "BTC".to_string(),
            quantity: 1.0,
            price: 10.0,
            message: "Bought 1 BTC at $10.00".to_string(),
            created_at,
            read: false,
        }
    }

    #[test]
    fn empty_snapshot_is_a_noop() {
        assert_eq!(plan(0, false), MigrationAction::Skip);
        assert_eq!(plan(0, true), MigrationAction::Skip);
    }

    #[test]
    fn existing_records_imply_already_migrated() {
        assert_eq!(plan(3, true), MigrationAction::DeleteSnapshotOnly);
    }

    #[test]
    fn empty_store_imports_the_snapshot() {
        assert_eq!(plan(3, false), MigrationAction::Import);
    }

    #[test]
    fn second_run_plans_no_second_import() {
        // after an Import the store has records, so the same snapshot (or a
        // stale copy of it) is only deleted
        assert_eq!(plan(3, false), MigrationAction::Import);
        assert_eq!(plan(3, true), MigrationAction::DeleteSnapshotOnly);
    }

    #[test]
    fn cap_keeps_most_recent_first() {
        let items: Vec<LegacyNotification> = (0..70).map(legacy).collect();

        let capped = cap_most_recent(items);
        assert_eq!(capped.len(), MAX_NOTIFICATIONS);
        assert_eq!(capped[0].created_at, 69);
        assert_eq!(capped.last().unwrap().created_at, 20);
    }

    #[test]
    fn small_snapshots_are_kept_whole() {
        let capped = cap_most_recent(vec![legacy(1), legacy(3), legacy(2)]);

        let times: Vec<i64> = capped.iter().map(|l| l.created_at).collect();
        assert_eq!(times, vec![3, 2, 1]);
    }

    #[test]
    fn imported_records_get_fresh_ids_and_keep_content() {
        let user = ObjectId::new();
        let n = import_record(user, legacy(42));

        assert_eq!(n.user_id, user);
        assert_eq!(n.created_at, 42);
        assert_eq!(n.coin, "BTC");
        assert!(!n.read);
    }
}
