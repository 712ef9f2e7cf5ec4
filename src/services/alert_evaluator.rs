use std::collections::HashMap;

use crate::models::{alert::AlertCondition, AlertRule};

/// Inclusive on both sides: a price exactly at the target fires.
pub fn condition_met(condition: AlertCondition, target_price: f64, price: f64) -> bool {
    match condition {
        AlertCondition::Above => price >= target_price,
        AlertCondition::Below => price <= target_price,
    }
}

/// Evaluates every eligible rule against a point-in-time price map.
///
/// Rules whose coin is missing from the map are skipped this round; price
/// feed gaps are routine. Pure: no store calls, lazy, yields in rule order.
pub fn evaluate<'a>(
    rules: &'a [AlertRule],
    prices: &'a HashMap<String, f64>,
) -> impl Iterator<Item = (&'a AlertRule, f64)> + 'a {
    rules.iter().filter_map(|rule| {
        if !rule.is_eligible() {
            return None;
        }
        let price = *prices.get(&rule.coin_id)?;
        condition_met(rule.condition, rule.target_price, price).then_some((rule, price))
    })
}

/// Single-coin variant used on individual price updates; routes through the
/// same predicate as the full sweep.
pub fn evaluate_for_coin<'a>(
    rules: &'a [AlertRule],
    coin_id: &'a str,
    price: f64,
) -> impl Iterator<Item = (&'a AlertRule, f64)> + 'a {
    rules.iter().filter_map(move |rule| {
        (rule.is_eligible()
            && rule.coin_id == coin_id
            && condition_met(rule.condition, rule.target_price, price))
        .then_some((rule, price))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn rule(coin_id: &str, condition: AlertCondition, target_price: f64) -> AlertRule {
        AlertRule {
            id: ObjectId::new(),
            user_id: ObjectId::new(),
            coin_id: coin_id.to_string(),
            symbol: coin_id.to_uppercase(),
            coin_name: coin_id.to_string(),
            condition,
            target_price,
            created_at: 0,
            is_active: true,
            triggered_at: None,
        }
    }

    fn prices(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn above_is_inclusive_at_the_target() {
        let r = [rule("bitcoin", AlertCondition::Above, 100.0)];

        assert_eq!(evaluate(&r, &prices(&[("bitcoin", 100.00)])).count(), 1);
        assert_eq!(evaluate(&r, &prices(&[("bitcoin", 100.01)])).count(), 1);
        assert_eq!(evaluate(&r, &prices(&[("bitcoin", 99.99)])).count(), 0);
    }

    #[test]
    fn below_is_inclusive_at_the_target() {
        let r = [rule("bitcoin", AlertCondition::Below, 100.0)];

        assert_eq!(evaluate(&r, &prices(&[("bitcoin", 100.00)])).count(), 1);
        assert_eq!(evaluate(&r, &prices(&[("bitcoin", 99.99)])).count(), 1);
        assert_eq!(evaluate(&r, &prices(&[("bitcoin", 100.01)])).count(), 0);
    }

    #[test]
    fn missing_price_skips_the_rule() {
        let r = [
            rule("bitcoin", AlertCondition::Above, 50.0),
            rule("ethereum", AlertCondition::Above, 50.0),
        ];

        let p = prices(&[("ethereum", 60.0)]);
        let matched: Vec<_> = evaluate(&r, &p).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].0.coin_id, "ethereum");
        assert_eq!(matched[0].1, 60.0);
    }

    #[test]
    fn triggered_rules_are_never_reevaluated() {
        let mut r = rule("bitcoin", AlertCondition::Above, 50.0);
        r.is_active = false;
        r.triggered_at = Some(123);
        let rules = [r];

        assert_eq!(evaluate(&rules, &prices(&[("bitcoin", 60.0)])).count(), 0);
    }

    #[test]
    fn inactive_but_untimestamped_rule_is_still_ineligible() {
        let mut r = rule("bitcoin", AlertCondition::Above, 50.0);
        r.is_active = false;
        let rules = [r];

        assert_eq!(evaluate(&rules, &prices(&[("bitcoin", 60.0)])).count(), 0);
    }

    #[test]
    fn single_coin_path_matches_the_sweep_predicate() {
        let rules = [
            rule("bitcoin", AlertCondition::Above, 50_000.0),
            rule("ethereum", AlertCondition::Below, 2_000.0),
        ];

        let matched: Vec<_> = evaluate_for_coin(&rules, "bitcoin", 50_001.0).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].0.coin_id, "bitcoin");

        assert_eq!(evaluate_for_coin(&rules, "bitcoin", 49_999.0).count(), 0);
    }

    #[test]
    fn matches_come_out_in_rule_order() {
        let rules = [
            rule("a", AlertCondition::Above, 1.0),
            rule("b", AlertCondition::Above, 1.0),
            rule("c", AlertCondition::Above, 1.0),
        ];
        let p = prices(&[("a", 2.0), ("b", 2.0), ("c", 2.0)]);

        let coins: Vec<&str> = evaluate(&rules, &p).map(|(r, _)| r.coin_id.as_str()).collect();
        assert_eq!(coins, vec!["a", "b", "c"]);
    }
}
