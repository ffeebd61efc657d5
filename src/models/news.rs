use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{flexible_datetime, string_or_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// Article body; may contain Markdown or inline HTML from the editor.
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub status: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub published_at: DateTime<Utc>,
}
