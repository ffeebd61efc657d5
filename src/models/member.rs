use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{flexible_datetime, string_or_number};

/// A published member profile. Members have no category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub bio: String,
    pub position: String,
    pub status: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_from_camel_case_payload() {
        let json = r#"{
            "id": 7,
            "name": "Ada Obi",
            "bio": "Volunteer coordinator",
            "position": "Coordinator",
            "status": "active",
            "profileImageUrl": "/uploads/ada.jpg",
            "createdAt": "2023-11-02T09:30:00Z"
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.id, "7");
        assert_eq!(member.profile_image_url.as_deref(), Some("/uploads/ada.jpg"));
    }

    #[test]
    fn test_member_without_image() {
        let json = r#"{
            "id": "m-1",
            "name": "Sam",
            "bio": "",
            "position": "Treasurer",
            "status": "active",
            "createdAt": "2023-11-02"
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert!(member.profile_image_url.is_none());
    }
}
