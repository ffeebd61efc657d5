use serde::{Deserialize, Serialize};

use super::event::Event;
use super::gallery::GalleryImage;
use super::member::Member;
use super::news::NewsArticle;
use super::project::Project;

/// One read-only copy of every portal collection.
///
/// Shared behind an `Arc` while a search runs; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub news: Vec<NewsArticle>,
    pub events: Vec<Event>,
    pub gallery: Vec<GalleryImage>,
    pub members: Vec<Member>,
}

impl Snapshot {
    /// Total number of records across all collections.
    pub fn total_len(&self) -> usize {
        self.projects.len()
            + self.news.len()
            + self.events.len()
            + self.gallery.len()
            + self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }
}
