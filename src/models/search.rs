use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The five record types a search can return.
///
/// Declaration order is the aggregation order used by the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    News,
    Event,
    Gallery,
    Member,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Project,
        EntityKind::News,
        EntityKind::Event,
        EntityKind::Gallery,
        EntityKind::Member,
    ];

    /// Path of the REST collection holding this record type.
    pub fn collection_path(&self) -> &'static str {
        match self {
            EntityKind::Project => "api/projects",
            EntityKind::News => "api/news",
            EntityKind::Event => "api/events",
            EntityKind::Gallery => "api/gallery",
            EntityKind::Member => "api/members",
        }
    }

    /// Portal page a result of this type links to.
    ///
    /// Events have no page of their own and are listed with projects.
    pub fn link_for(&self, id: &str) -> String {
        match self {
            EntityKind::Project | EntityKind::Event => "/projects".to_string(),
            EntityKind::News => format!("/news/{id}"),
            EntityKind::Gallery => "/gallery".to_string(),
            EntityKind::Member => "/members".to_string(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Project => write!(f, "project"),
            EntityKind::News => write!(f, "news"),
            EntityKind::Event => write!(f, "event"),
            EntityKind::Gallery => write!(f, "gallery"),
            EntityKind::Member => write!(f, "member"),
        }
    }
}

/// The entity-type selector of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityScope {
    #[default]
    All,
    Only(EntityKind),
}

impl EntityScope {
    pub fn includes(&self, kind: EntityKind) -> bool {
        match self {
            EntityScope::All => true,
            EntityScope::Only(k) => *k == kind,
        }
    }
}

impl FromStr for EntityScope {
    type Err = AppError;

    /// Accepts the selector values of the portal UI (`projects`, `events`, ...)
    /// as well as their singular forms. Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_lowercase().as_str() {
            "" | "all" => return Ok(EntityScope::All),
            "project" | "projects" => EntityKind::Project,
            "news" => EntityKind::News,
            "event" | "events" => EntityKind::Event,
            "gallery" => EntityKind::Gallery,
            "member" | "members" => EntityKind::Member,
            other => {
                return Err(AppError::BadRequest(format!(
                    "unknown entity type '{other}'"
                )))
            }
        };
        Ok(EntityScope::Only(kind))
    }
}

/// A normalized, cross-entity search hit. Rebuilt on every search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub relevance_score: f64,
}

impl SearchResult {
    pub fn link(&self) -> String {
        self.kind.link_for(&self.id)
    }
}
