use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::Repository;
use crate::models::club::{Club, NewClub};
use crate::models::event::EventWindow;
use crate::store;
use crate::utils::error::AppError;
use crate::validation;

/// Search/category filter for the club listing. `category: "All"` (or no
/// category at all) is the match-everything sentinel the UI sends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubStats {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub total_members: u32,
    pub total_followers: usize,
}

impl Repository {
    /// Case-insensitive substring match on name and description, exact
    /// match on category. Insertion order of the collection is preserved.
    pub fn list_clubs(&self, filter: &ClubFilter) -> Vec<Club> {
        let search = filter
            .search
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        self.read_collection::<Club>(store::CLUBS)
            .into_iter()
            .filter(|club| {
                let matches_search = search.is_empty()
                    || club.name.to_lowercase().contains(&search)
                    || club.description.to_lowercase().contains(&search);
                let matches_category = match filter.category.as_deref() {
                    None | Some("All") => true,
                    Some(category) => club.category.as_str() == category,
                };
                matches_search && matches_category
            })
            .collect()
    }

    pub fn get_club(&self, id: Uuid) -> Result<Club, AppError> {
        self.read_collection::<Club>(store::CLUBS)
            .into_iter()
            .find(|club| club.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Club with id '{id}' was not found")))
    }

    /// Registers a club. The creator becomes the admin, the only member,
    /// and the first follower, whatever the payload may have claimed.
    pub fn create_club(&self, input: NewClub, creator: Uuid) -> Result<Club, AppError> {
        validation::validate_club(&input)?;

        let _guard = self.lock();
        let mut clubs: Vec<Club> = self.read_collection(store::CLUBS);

        let club = Club {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            category: input.category,
            founded_year: input.founded_year.unwrap_or_else(|| Utc::now().year()),
            meeting_schedule: input.meeting_schedule.unwrap_or_default(),
            logo_url: input.logo_url.unwrap_or_default(),
            admin_id: creator,
            member_count: 1,
            members: BTreeSet::from([creator]),
            followers: BTreeSet::from([creator]),
            created_at: Utc::now(),
        };

        clubs.push(club.clone());
        self.write_collection(store::CLUBS, &clubs)?;
        tracing::info!(club_id = %club.id, name = %club.name, "Club created");
        Ok(club)
    }

    pub fn follow_club(&self, club_id: Uuid, user_id: Uuid) -> Result<Club, AppError> {
        self.update_club(club_id, |club| {
            club.followers.insert(user_id);
        })
    }

    /// Removing an absent follower is not an error; the toggle is
    /// idempotent in both directions.
    pub fn unfollow_club(&self, club_id: Uuid, user_id: Uuid) -> Result<Club, AppError> {
        self.update_club(club_id, |club| {
            club.followers.remove(&user_id);
        })
    }

    /// Clubs whose follower set contains the user, in insertion order.
    pub fn clubs_followed_by(&self, user_id: Uuid) -> Vec<Club> {
        self.read_collection::<Club>(store::CLUBS)
            .into_iter()
            .filter(|club| club.followers.contains(&user_id))
            .collect()
    }

    /// Recomputed from the collections on every call; nothing is cached.
    pub fn club_stats(&self, club_id: Uuid) -> Result<ClubStats, AppError> {
        let club = self.get_club(club_id)?;
        let events = self.list_events_for_club(club_id, EventWindow::All)?;
        let now = Utc::now();
        let upcoming = events.iter().filter(|event| event.starts_at() > now).count();

        Ok(ClubStats {
            total_events: events.len(),
            upcoming_events: upcoming,
            total_members: club.member_count,
            total_followers: club.followers.len(),
        })
    }

    fn update_club(
        &self,
        club_id: Uuid,
        mutate: impl FnOnce(&mut Club),
    ) -> Result<Club, AppError> {
        let _guard = self.lock();
        let mut clubs: Vec<Club> = self.read_collection(store::CLUBS);

        let index = clubs
            .iter()
            .position(|club| club.id == club_id)
            .ok_or_else(|| AppError::NotFound(format!("Club with id '{club_id}' was not found")))?;
        mutate(&mut clubs[index]);
        let updated = clubs[index].clone();

        self.write_collection(store::CLUBS, &clubs)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::repository;
    use super::*;
    use crate::models::ClubCategory;

    fn chess_club() -> NewClub {
        NewClub {
            name: "Chess Club".to_string(),
            description: "Weekly games and tournaments".to_string(),
            category: ClubCategory::Academic,
            founded_year: Some(2019),
            meeting_schedule: Some("Thursdays 6pm".to_string()),
            logo_url: None,
        }
    }

    #[test]
    fn test_create_club_seeds_membership_from_creator() {
        let repo = repository();
        let creator = Uuid::new_v4();

        let club = repo.create_club(chess_club(), creator).unwrap();

        assert_eq!(club.admin_id, creator);
        assert_eq!(club.member_count, 1);
        assert_eq!(club.members, BTreeSet::from([creator]));
        assert_eq!(club.followers, BTreeSet::from([creator]));
    }

    #[test]
    fn test_create_club_rejects_blank_name() {
        let repo = repository();
        let mut input = chess_club();
        input.name = "  ".to_string();

        let err = repo.create_club(input, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));
        assert!(repo.list_clubs(&ClubFilter::default()).is_empty());
    }

    #[test]
    fn test_list_clubs_without_filter_is_identity() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let first = repo.create_club(chess_club(), creator).unwrap();
        let mut second_input = chess_club();
        second_input.name = "Debate Society".to_string();
        second_input.category = ClubCategory::Political;
        let second = repo.create_club(second_input, creator).unwrap();

        let filter = ClubFilter {
            search: Some(String::new()),
            category: Some("All".to_string()),
        };
        let listed = repo.list_clubs(&filter);

        let ids: Vec<Uuid> = listed.iter().map(|club| club.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_list_clubs_search_matches_name_and_description() {
        let repo = repository();
        let creator = Uuid::new_v4();
        repo.create_club(chess_club(), creator).unwrap();
        let mut other = chess_club();
        other.name = "Hiking Society".to_string();
        other.description = "Trail walks every weekend".to_string();
        other.category = ClubCategory::Sports;
        repo.create_club(other, creator).unwrap();

        let by_name = repo.list_clubs(&ClubFilter {
            search: Some("chess".to_string()),
            category: None,
        });
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Chess Club");

        let by_description = repo.list_clubs(&ClubFilter {
            search: Some("TRAIL".to_string()),
            category: None,
        });
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].name, "Hiking Society");
    }

    #[test]
    fn test_list_clubs_category_is_exact() {
        let repo = repository();
        let creator = Uuid::new_v4();
        repo.create_club(chess_club(), creator).unwrap();

        let academic = repo.list_clubs(&ClubFilter {
            search: None,
            category: Some("Academic".to_string()),
        });
        assert_eq!(academic.len(), 1);

        let sports = repo.list_clubs(&ClubFilter {
            search: None,
            category: Some("Sports".to_string()),
        });
        assert!(sports.is_empty());
    }

    #[test]
    fn test_follow_then_unfollow_is_idempotent() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let follower = Uuid::new_v4();
        let club = repo.create_club(chess_club(), creator).unwrap();
        let before = club.followers.clone();

        repo.follow_club(club.id, follower).unwrap();
        repo.follow_club(club.id, follower).unwrap();
        let followed = repo.get_club(club.id).unwrap();
        assert!(followed.followers.contains(&follower));
        assert_eq!(followed.followers.len(), before.len() + 1);

        repo.unfollow_club(club.id, follower).unwrap();
        repo.unfollow_club(club.id, follower).unwrap();
        let after = repo.get_club(club.id).unwrap();
        assert_eq!(after.followers, before);
    }

    #[test]
    fn test_follow_unknown_club_is_not_found() {
        let repo = repository();
        let err = repo.follow_club(Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_clubs_followed_by_tracks_follow_state() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let follower = Uuid::new_v4();
        let club = repo.create_club(chess_club(), creator).unwrap();

        assert!(repo.clubs_followed_by(follower).is_empty());

        repo.follow_club(club.id, follower).unwrap();
        let followed = repo.clubs_followed_by(follower);
        assert_eq!(followed.len(), 1);
        assert_eq!(followed[0].id, club.id);
    }
}
