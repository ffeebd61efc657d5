use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{flexible_datetime, string_or_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub status: String,
    pub image_url: String,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}
