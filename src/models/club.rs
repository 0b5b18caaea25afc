use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// The ten fixed categories a club can register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClubCategory {
    Technology,
    #[serde(rename = "Arts & Culture")]
    ArtsCulture,
    Business,
    #[serde(rename = "Community Service")]
    CommunityService,
    Academic,
    Sports,
    Religious,
    Political,
    Environmental,
    Other,
}

impl ClubCategory {
    pub const ALL: [ClubCategory; 10] = [
        ClubCategory::Technology,
        ClubCategory::ArtsCulture,
        ClubCategory::Business,
        ClubCategory::CommunityService,
        ClubCategory::Academic,
        ClubCategory::Sports,
        ClubCategory::Religious,
        ClubCategory::Political,
        ClubCategory::Environmental,
        ClubCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClubCategory::Technology => "Technology",
            ClubCategory::ArtsCulture => "Arts & Culture",
            ClubCategory::Business => "Business",
            ClubCategory::CommunityService => "Community Service",
            ClubCategory::Academic => "Academic",
            ClubCategory::Sports => "Sports",
            ClubCategory::Religious => "Religious",
            ClubCategory::Political => "Political",
            ClubCategory::Environmental => "Environmental",
            ClubCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ClubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `members` and `followers` are sets, so follow/unfollow toggles are
/// idempotent and cannot introduce duplicate entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: ClubCategory,
    pub founded_year: i32,
    pub meeting_schedule: String,
    pub logo_url: String,
    pub admin_id: Uuid,
    pub member_count: u32,
    pub members: BTreeSet<Uuid>,
    pub followers: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Club registration payload. Membership fields are deliberately absent:
/// the repository decides member and follower contents at creation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClub {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ClubCategory,
    #[serde(default)]
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub meeting_schedule: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_display_strings() {
        for category in ClubCategory::ALL {
            let encoded = serde_json::to_string(&category).unwrap();
            assert_eq!(encoded, format!("\"{}\"", category.as_str()));
            let decoded: ClubCategory = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, category);
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = serde_json::from_str::<ClubCategory>("\"Knitting\"");
        assert!(result.is_err());
    }
}
