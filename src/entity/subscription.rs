//! Canonical subscription record.

use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

pub type SubscriptionId = i64;

/// Subscription status as reported by the server.
///
/// The client never sets this itself; it only observes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubscriptionStatus {
    #[default]
    Active,
    InProgress,
    Canceling,
    Canceled,
    Paused,
    Failed,
    AttentionNeeded,
    Pending,
    Succeeded,
    Unknown(String),
}

impl SubscriptionStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "in_progress" => Self::InProgress,
            "canceling" => Self::Canceling,
            "canceled" => Self::Canceled,
            "paused" => Self::Paused,
            "failed" => Self::Failed,
            "attention_needed" => Self::AttentionNeeded,
            "pending" => Self::Pending,
            "succeeded" => Self::Succeeded,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Canceling => "canceling",
            Self::Canceled => "canceled",
            Self::Paused => "paused",
            Self::Failed => "failed",
            Self::AttentionNeeded => "attention_needed",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Unknown(other) => other,
        }
    }

    /// No further automatic change is expected once a subscription is here.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Canceled | Self::Paused)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
    Other(String),
}

impl Interval {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An amount in cents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(pub i64);

impl Money {
    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub merchant: String,
    pub plan: Option<String>,
    pub amount: Option<Money>,
    pub interval: Option<Interval>,
    /// `cancel_status` when the server sent one, otherwise `status`.
    pub status: SubscriptionStatus,
    /// The server's own `status` field, which moves to `paused` or
    /// `canceled` independently of `cancel_status`.
    pub lifecycle: SubscriptionStatus,
    pub next_renewal_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// `Merchant — Plan $15.49/month`, leaving out whatever is unknown.
    pub fn headline(&self) -> String {
        let mut line = self.merchant.clone();
        if let Some(plan) = &self.plan {
            line.push_str(" — ");
            line.push_str(plan);
        }
        if let Some(amount) = self.amount {
            line.push(' ');
            line.push_str(&amount.to_string());
            if let Some(interval) = &self.interval {
                line.push('/');
                line.push_str(interval.as_str());
            }
        }
        line
    }

    /// The status that decides whether the server is done with this
    /// subscription. A terminal lifecycle wins over a lagging cancel status.
    pub fn settled_status(&self) -> &SubscriptionStatus {
        if self.lifecycle.is_terminal() {
            &self.lifecycle
        } else {
            &self.status
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.settled_status().is_terminal()
    }

    /// Whether a new cancellation makes sense for this subscription.
    pub fn can_start_cancellation(&self) -> bool {
        !matches!(
            self.status,
            SubscriptionStatus::InProgress | SubscriptionStatus::Canceled
        ) && self.lifecycle != SubscriptionStatus::Canceled
    }
}

/// A money value as the server may send it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawMoney {
    Number(f64),
    Text(String),
}

/// Every subscription field the server has been seen to send.
///
/// Older deployments send `status` only; newer ones add `cancel_status`.
/// Money comes as cents or major units under several names.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawSubscription {
    pub id: SubscriptionId,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub price_cents: Option<RawMoney>,
    #[serde(default)]
    pub amount_cents: Option<RawMoney>,
    #[serde(default)]
    pub price: Option<RawMoney>,
    #[serde(default)]
    pub amount: Option<RawMoney>,
    #[serde(default)]
    pub plan_amount: Option<RawMoney>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cancel_status: Option<String>,
    #[serde(default)]
    pub next_renewal_at: Option<String>,
}
