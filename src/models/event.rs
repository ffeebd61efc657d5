use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{flexible_datetime, string_or_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub location: String,
    #[serde(deserialize_with = "flexible_datetime")]
    pub date: DateTime<Utc>,
}
