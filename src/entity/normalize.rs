//! Normalization of raw server subscriptions into [`Subscription`].

use log::debug;
use log::warn;
use serde_json::Value;

use crate::entity::subscription::Interval;
use crate::entity::subscription::Money;
use crate::entity::subscription::RawMoney;
use crate::entity::subscription::RawSubscription;
use crate::entity::subscription::Subscription;
use crate::entity::subscription::SubscriptionStatus;
use crate::entity::time::parse_server_time;

/// Builds the canonical record from a raw server subscription.
///
/// Money is taken from the first of `price_cents`, `amount_cents`, `price`,
/// `amount`, `plan_amount` that yields a value. The `*_cents` fields are in
/// cents, the others in major units. Status prefers `cancel_status` over
/// `status` and defaults to active; `status` itself is kept as the lifecycle.
pub fn normalize(raw: RawSubscription) -> Subscription {
    let amount = cents(raw.price_cents.as_ref())
        .or_else(|| cents(raw.amount_cents.as_ref()))
        .or_else(|| major_units(raw.price.as_ref()))
        .or_else(|| major_units(raw.amount.as_ref()))
        .or_else(|| major_units(raw.plan_amount.as_ref()))
        .map(Money);

    let lifecycle = raw
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(SubscriptionStatus::parse)
        .unwrap_or_default();
    let status = raw
        .cancel_status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(SubscriptionStatus::parse)
        .unwrap_or_else(|| lifecycle.clone());

    let next_renewal_at = raw.next_renewal_at.as_deref().and_then(|value| {
        let parsed = parse_server_time(value);
        if parsed.is_none() {
            debug!("Ignoring unparsable next_renewal_at `{value}` on subscription {}", raw.id);
        }
        parsed
    });

    Subscription {
        id: raw.id,
        merchant: raw.merchant.unwrap_or_default(),
        plan: raw.plan.filter(|p| !p.trim().is_empty()),
        amount,
        interval: raw.interval.as_deref().and_then(parse_interval),
        status,
        lifecycle,
        next_renewal_at,
    }
}

/// Normalizes a JSON collection of subscriptions.
///
/// A body that is not an array yields an empty list; entries that cannot be
/// read as a subscription are skipped.
pub fn normalize_collection(body: Value) -> Vec<Subscription> {
    let Value::Array(items) = body else {
        warn!("Expected a subscription array, got: {body}");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawSubscription>(item) {
            Ok(raw) => Some(normalize(raw)),
            Err(e) => {
                warn!("Skipping unreadable subscription entry: {e}");
                None
            }
        })
        .collect()
}

/// Maps the interval spellings the server uses onto [`Interval`].
pub fn parse_interval(value: &str) -> Option<Interval> {
    let value = value.trim().to_lowercase();
    match value.as_str() {
        "" => None,
        "mo" | "mon" | "month" | "monthly" => Some(Interval::Month),
        "yr" | "year" | "yearly" | "annual" | "annually" => Some(Interval::Year),
        v if v.starts_with("week") => Some(Interval::Week),
        v if v.starts_with("day") => Some(Interval::Day),
        other => Some(Interval::Other(other.to_string())),
    }
}

fn cents(value: Option<&RawMoney>) -> Option<i64> {
    match value? {
        RawMoney::Number(n) if n.is_finite() => Some(n.round() as i64),
        RawMoney::Number(_) => None,
        RawMoney::Text(text) => parse_decimal(text).map(|n| n.round() as i64),
    }
}

fn major_units(value: Option<&RawMoney>) -> Option<i64> {
    match value? {
        RawMoney::Number(n) if n.is_finite() => Some((n * 100.0).round() as i64),
        RawMoney::Number(_) => None,
        RawMoney::Text(text) => parse_decimal(text).map(|n| (n * 100.0).round() as i64),
    }
}

/// Reads `"$15.49"`, `"15.49 USD"` and the like.
fn parse_decimal(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}
