use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

use super::Repository;
use crate::models::event::{Event, EventWindow, NewEvent};
use crate::store;
use crate::utils::error::AppError;
use crate::validation;

impl Repository {
    /// Validates and appends an event, then fans notifications out to the
    /// club's current followers. The club reference is resolved first, so a
    /// dangling club id writes nothing. Once the event write has committed,
    /// fan-out failures are logged and swallowed; notifications are
    /// best-effort.
    pub fn create_event(&self, input: NewEvent, club_id: Uuid) -> Result<Event, AppError> {
        let _guard = self.lock();

        let club = self
            .read_collection::<crate::models::Club>(store::CLUBS)
            .into_iter()
            .find(|club| club.id == club_id)
            .ok_or_else(|| AppError::NotFound(format!("Club with id '{club_id}' was not found")))?;

        let today = Utc::now().date_naive();
        let draft = validation::validate_event(&input, today)?;

        let mut events: Vec<Event> = self.read_collection(store::EVENTS);
        let event = Event {
            id: Uuid::new_v4(),
            club_id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            capacity: draft.capacity,
            image_url: draft.image_url,
            registration_required: draft.registration_required,
            registration_deadline: draft.registration_deadline,
            tags: draft.tags,
            attendees: BTreeSet::new(),
            created_at: Utc::now(),
        };

        events.push(event.clone());
        self.write_collection(store::EVENTS, &events)?;
        tracing::info!(event_id = %event.id, club_id = %club_id, "Event created");

        match self.fan_out_new_event(&club, &event) {
            Ok(count) if count > 0 => {
                tracing::info!(event_id = %event.id, count, "Notified followers");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(event_id = %event.id, error = %e, "Notification fan-out failed after event write");
            }
        }

        Ok(event)
    }

    /// Upcoming means the event day starts strictly after now; past is
    /// everything at or before now.
    pub fn list_events_for_club(
        &self,
        club_id: Uuid,
        window: EventWindow,
    ) -> Result<Vec<Event>, AppError> {
        self.get_club(club_id)?;

        let now = Utc::now();
        let events = self
            .read_collection::<Event>(store::EVENTS)
            .into_iter()
            .filter(|event| event.club_id == club_id)
            .filter(|event| match window {
                EventWindow::All => true,
                EventWindow::Upcoming => event.starts_at() > now,
                EventWindow::Past => event.starts_at() <= now,
            })
            .collect();
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::repository;
    use super::*;
    use crate::models::club::NewClub;
    use crate::models::{Club, ClubCategory, NotificationKind};
    use chrono::Duration;

    fn make_club(repo: &Repository, creator: Uuid) -> Club {
        repo.create_club(
            NewClub {
                name: "Chess Club".to_string(),
                description: "Weekly games".to_string(),
                category: ClubCategory::Academic,
                founded_year: None,
                meeting_schedule: None,
                logo_url: None,
            },
            creator,
        )
        .unwrap()
    }

    fn meetup(days_ahead: i64) -> NewEvent {
        NewEvent {
            title: "Opening Meetup".to_string(),
            description: "Season kickoff".to_string(),
            date: Some(Utc::now().date_naive() + Duration::days(days_ahead)),
            time: "18:00".to_string(),
            location: "Library".to_string(),
            ..NewEvent::default()
        }
    }

    #[test]
    fn test_create_event_appends_and_notifies_followers() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let club = make_club(&repo, creator);

        let event = repo.create_event(meetup(1), club.id).unwrap();
        assert_eq!(event.club_id, club.id);
        assert!(event.attendees.is_empty());

        // The creator follows their own club, so exactly one notification.
        let notifications = repo.notifications_for_user(creator);
        assert_eq!(notifications.len(), 1);
        let notification = &notifications[0];
        assert_eq!(notification.kind, NotificationKind::NewEvent);
        assert_eq!(notification.club_id, Some(club.id));
        assert_eq!(notification.event_id, Some(event.id));
        assert!(!notification.read);
        assert_eq!(notification.title, "New Event: Opening Meetup");
    }

    #[test]
    fn test_create_event_with_past_date_writes_nothing() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let club = make_club(&repo, creator);

        let err = repo.create_event(meetup(-1), club.id).unwrap_err();
        let AppError::InvalidFields(fields) = err else {
            panic!("expected field errors");
        };
        assert_eq!(fields.get("date"), Some("Date cannot be in the past"));

        let events = repo.list_events_for_club(club.id, EventWindow::All).unwrap();
        assert!(events.is_empty());
        assert!(repo.notifications_for_user(creator).is_empty());
    }

    #[test]
    fn test_create_event_rejects_dangling_club() {
        let repo = repository();
        let err = repo.create_event(meetup(1), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_fan_out_covers_every_follower_once() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let club = make_club(&repo, creator);
        let followers: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for &follower in &followers {
            repo.follow_club(club.id, follower).unwrap();
        }

        repo.create_event(meetup(2), club.id).unwrap();

        for &follower in &followers {
            assert_eq!(repo.notifications_for_user(follower).len(), 1);
        }
        // creator included: 3 followers + 1
        assert_eq!(repo.unread_count(creator), 1);
    }

    #[test]
    fn test_event_window_partitions_by_date() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let club = make_club(&repo, creator);

        let upcoming = repo.create_event(meetup(3), club.id).unwrap();
        let today_event = repo.create_event(meetup(0), club.id).unwrap();

        let all = repo.list_events_for_club(club.id, EventWindow::All).unwrap();
        assert_eq!(all.len(), 2);

        let upcoming_only = repo
            .list_events_for_club(club.id, EventWindow::Upcoming)
            .unwrap();
        assert_eq!(upcoming_only.len(), 1);
        assert_eq!(upcoming_only[0].id, upcoming.id);

        // Today's midnight is at-or-before now, so it lands in the past bucket.
        let past_only = repo.list_events_for_club(club.id, EventWindow::Past).unwrap();
        assert_eq!(past_only.len(), 1);
        assert_eq!(past_only[0].id, today_event.id);
    }

    #[test]
    fn test_club_stats_counts_events_and_membership() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let club = make_club(&repo, creator);
        let follower = Uuid::new_v4();
        repo.follow_club(club.id, follower).unwrap();

        repo.create_event(meetup(1), club.id).unwrap();
        repo.create_event(meetup(7), club.id).unwrap();
        repo.create_event(meetup(0), club.id).unwrap();

        let stats = repo.club_stats(club.id).unwrap();
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.upcoming_events, 2);
        assert_eq!(stats.total_members, 1);
        assert_eq!(stats.total_followers, 2);
    }

    #[test]
    fn test_capacity_string_is_parsed_into_the_record() {
        let repo = repository();
        let creator = Uuid::new_v4();
        let club = make_club(&repo, creator);

        let mut input = meetup(1);
        input.capacity = Some("25".to_string());
        input.tags = Some("chess, beginners".to_string());
        let event = repo.create_event(input, club.id).unwrap();

        assert_eq!(event.capacity, Some(25));
        assert_eq!(event.tags, vec!["chess", "beginners"]);
    }
}
