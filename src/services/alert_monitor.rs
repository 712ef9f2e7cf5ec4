use std::{collections::HashSet, time::Duration};

use futures_util::StreamExt;
use mongodb::bson::doc;
use tokio::time;

use crate::{
    models::AlertRule,
    services::{alert_evaluator, trigger_service, trigger_service::TriggerError},
    AppState,
};

/// Periodic sweep: every eligible rule in the store is checked against one
/// batched price snapshot.
pub fn spawn_price_alert_monitor(state: AppState) {
    let period = Duration::from_secs(state.settings.alert_poll_secs);

    tokio::spawn(async move {
        let mut interval = time::interval(period);

        loop {
            interval.tick().await;

            if let Err(e) = run_sweep(&state).await {
                tracing::warn!("alert sweep error: {}", e);
            }
        }
    });
}

async fn run_sweep(state: &AppState) -> Result<(), String> {
    let rules_col = state.db.collection::<AlertRule>("price_alerts");

    // 1) Fetch all eligible rules across users
    let mut cursor = rules_col
        .find(doc! { "is_active": true, "triggered_at": null }, None)
        .await
        .map_err(|e| e.to_string())?;

    let mut rules: Vec<AlertRule> = Vec::new();
    while let Some(item) = cursor.next().await {
        rules.push(item.map_err(|e| e.to_string())?);
    }

    if rules.is_empty() {
        return Ok(());
    }

    // 2) One price request for all coins referenced this tick
    let ids: Vec<String> = rules
        .iter()
        .map(|r| r.coin_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let prices = state.prices.simple_prices(&ids).await?;

    // 3) Trigger matches; a failed trigger leaves the rule eligible for the
    // next sweep
    for (rule, price) in alert_evaluator::evaluate(&rules, &prices) {
        match trigger_service::trigger_rule(state, rule, price).await {
            Ok(n) => {
                tracing::info!(
                    user = %rule.user_id.to_hex(),
                    coin = %rule.coin_id,
                    price,
                    "price alert fired: {}",
                    n.message
                );
            }
            Err(TriggerError::AlreadyTriggered) => {
                tracing::debug!(rule = %rule.id.to_hex(), "lost trigger race, duplicate suppressed");
            }
            Err(e) => {
                tracing::warn!(rule = %rule.id.to_hex(), "trigger failed: {}", e);
            }
        }
    }

    Ok(())
}

/// Single-coin variant used when a caller learns one fresh price out of band.
/// Routes through the same predicate and trigger path as the sweep.
pub async fn check_coin_price(state: &AppState, coin_id: &str, price: f64) -> Result<u32, String> {
    let rules_col = state.db.collection::<AlertRule>("price_alerts");

    let mut cursor = rules_col
        .find(
            doc! { "coin_id": coin_id, "is_active": true, "triggered_at": null },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    let mut rules: Vec<AlertRule> = Vec::new();
    while let Some(item) = cursor.next().await {
        rules.push(item.map_err(|e| e.to_string())?);
    }

    let mut fired = 0u32;
    for (rule, matched) in alert_evaluator::evaluate_for_coin(&rules, coin_id, price) {
        match trigger_service::trigger_rule(state, rule, matched).await {
            Ok(_) => fired += 1,
            Err(TriggerError::AlreadyTriggered) => {}
            Err(e) => {
                tracing::warn!(rule = %rule.id.to_hex(), "trigger failed: {}", e);
            }
        }
    }

    Ok(fired)
}
