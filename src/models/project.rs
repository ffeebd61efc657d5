use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{flexible_datetime, string_or_number};

/// How much difference a project is expected to make, as set by admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub status: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    /// Admin-assigned priority, 0 to 10.
    #[serde(default)]
    pub priority_score: Option<u8>,
    #[serde(default)]
    pub impact_level: Option<ImpactLevel>,
}
