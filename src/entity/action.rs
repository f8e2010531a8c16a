//! Request and response bodies of the approval, cancellation and bank-link calls.

use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::entity::subscription::SubscriptionId;
use crate::entity::time::deserialize_optional_time;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Deny,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Deny => "deny",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ApprovalRequest {
    pub subscription_id: SubscriptionId,
    pub decision: Decision,
}

/// Server acknowledgement of a decision.
///
/// A deny may start a cancellation server-side; `cancel_started` and `error`
/// report how that went.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApprovalOutcome {
    pub subscription_id: SubscriptionId,
    pub decision: Decision,
    #[serde(default)]
    pub cancel_started: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CancellationRequest {
    pub subscription_id: SubscriptionId,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CancellationStarted {
    pub subscription_id: SubscriptionId,
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CancellationStatus {
    pub subscription_id: SubscriptionId,
    #[serde(default)]
    pub cancel_status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub canceled_at: Option<DateTime<Utc>>,
}

/// Session token for the bank-link widget.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LinkToken {
    pub link_token: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PublicTokenExchange {
    pub public_token: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExchangeResult {
    pub status: String,
}
