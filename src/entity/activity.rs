use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::entity::time::deserialize_optional_time;

/// One entry of the `/events/` audit log, newest first.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ActivityEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub created_at: Option<DateTime<Utc>>,
}
