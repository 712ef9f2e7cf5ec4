use mongodb::bson::{doc, oid::ObjectId};
use serde::Deserialize;

use crate::{models::{NotificationKind, UserSettings}, AppState};

/// Whether a given event class may produce a notification at all.
///
/// Price alerts are always allowed: alert delivery must not be silently
/// suppressed by the portfolio toggle (only alert UI surfacing is gated, and
/// that lives in the client). When settings have not loaded yet the gate
/// defaults to allowing, so early events are not dropped.
pub fn allows(settings: Option<&UserSettings>, kind: NotificationKind) -> bool {
    if !kind.is_portfolio() {
        return true;
    }

    settings.map(|s| s.portfolio_updates).unwrap_or(true)
}

pub async fn load(state: &AppState, user_id: ObjectId) -> Result<Option<UserSettings>, String> {
    let col = state.db.collection::<UserSettings>("user_settings");

    col.find_one(doc! { "user_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_or_create(state: &AppState, user_id: ObjectId) -> Result<UserSettings, String> {
    if let Some(existing) = load(state, user_id).await? {
        return Ok(existing);
    }

    let col = state.db.collection::<UserSettings>("user_settings");
    let settings = UserSettings::defaults_for(user_id);

    col.insert_one(&settings, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(settings)
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, rename = "portfolioUpdates")]
    pub portfolio_updates: Option<bool>,

    #[serde(default, rename = "marketTrends")]
    pub market_trends: Option<bool>,

    #[serde(default, rename = "priceAlertsEnabled")]
    pub price_alerts_enabled: Option<bool>,
}

pub async fn update(
    state: &AppState,
    user_id: ObjectId,
    patch: SettingsPatch,
) -> Result<UserSettings, String> {
    let mut settings = get_or_create(state, user_id).await?;

    if let Some(v) = patch.portfolio_updates {
        settings.portfolio_updates = v;
    }
    if let Some(v) = patch.market_trends {
        settings.market_trends = v;
    }
    if let Some(v) = patch.price_alerts_enabled {
        settings.price_alerts_enabled = v;
    }

    let col = state.db.collection::<UserSettings>("user_settings");
    col.update_one(
        doc! { "user_id": user_id },
        doc! { "$set": {
            "portfolio_updates": settings.portfolio_updates,
            "market_trends": settings.market_trends,
            "price_alerts_enabled": settings.price_alerts_enabled,
        } },
        None,
    )
    .await
    .map_err(|e| e.to_string())?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(portfolio_updates: bool) -> UserSettings {
        UserSettings {
            portfolio_updates,
            ..UserSettings::defaults_for(ObjectId::new())
        }
    }

    #[test]
    fn portfolio_kinds_follow_the_portfolio_toggle() {
        let off = settings(false);
        let on = settings(true);

        for kind in [NotificationKind::Buy, NotificationKind::Sell, NotificationKind::Delete] {
            assert!(!allows(Some(&off), kind));
            assert!(allows(Some(&on), kind));
        }
    }

    #[test]
    fn price_alerts_are_never_gated() {
        let mut s = settings(false);
        s.price_alerts_enabled = false;

        assert!(allows(Some(&s), NotificationKind::PriceAlert));
        assert!(allows(None, NotificationKind::PriceAlert));
    }

    #[test]
    fn missing_settings_default_to_allowing() {
        assert!(allows(None, NotificationKind::Buy));
        assert!(allows(None, NotificationKind::Delete));
    }
}
