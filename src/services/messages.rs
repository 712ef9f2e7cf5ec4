use crate::models::{alert::AlertCondition, AlertRule, NotificationKind};

fn fmt2(x: f64) -> String {
    format!("{:.2}", x)
}

/// Message for a triggered price alert, e.g.
/// `Bitcoin (BTC) has risen above 50000! Current price: 50001.00`
pub fn alert_message(rule: &AlertRule, matched_price: f64) -> String {
    let direction = match rule.condition {
        AlertCondition::Above => "risen above",
        AlertCondition::Below => "fallen below",
    };

    format!(
        "{} ({}) has {} {}! Current price: {}",
        rule.coin_name,
        rule.symbol,
        direction,
        rule.target_price,
        fmt2(matched_price)
    )
}

/// Message for a direct portfolio action, e.g. `Bought 0.5 BTC at $27123.45`.
pub fn portfolio_message(kind: NotificationKind, coin: &str, quantity: f64, price: f64) -> String {
    match kind {
        NotificationKind::Buy => format!("Bought {} {} at ${}", quantity, coin, fmt2(price)),
        NotificationKind::Sell => format!("Sold {} {} at ${}", quantity, coin, fmt2(price)),
        NotificationKind::Delete => format!("Removed {} {} from portfolio", quantity, coin),
        NotificationKind::PriceAlert => format!("Price alert for {}", coin),
    }
}
