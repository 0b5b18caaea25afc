use chrono::Utc;
use uuid::Uuid;

use super::Repository;
use crate::models::club::Club;
use crate::models::event::Event;
use crate::models::notification::{Notification, NotificationKind};
use crate::store::{self, StoreError};
use crate::utils::error::AppError;

impl Repository {
    /// Mints one `new_event` notification per current follower. Called with
    /// the repository lock already held, directly after the event write.
    pub(super) fn fan_out_new_event(
        &self,
        club: &Club,
        event: &Event,
    ) -> Result<usize, StoreError> {
        if club.followers.is_empty() {
            return Ok(0);
        }

        let mut notifications: Vec<Notification> = self.read_collection(store::NOTIFICATIONS);
        let formatted_date = event.date.format("%B %-d, %Y").to_string();

        for &user_id in &club.followers {
            notifications.push(Notification {
                id: Uuid::new_v4(),
                user_id,
                kind: NotificationKind::NewEvent,
                title: format!("New Event: {}", event.title),
                message: format!(
                    "{} has posted a new event: {} on {}.",
                    club.name, event.title, formatted_date
                ),
                created_at: Utc::now(),
                read: false,
                club_id: Some(club.id),
                event_id: Some(event.id),
            });
        }

        self.write_collection(store::NOTIFICATIONS, &notifications)?;
        Ok(club.followers.len())
    }

    /// A user's notifications, newest first.
    pub fn notifications_for_user(&self, user_id: Uuid) -> Vec<Notification> {
        let mut notifications: Vec<Notification> = self
            .read_collection::<Notification>(store::NOTIFICATIONS)
            .into_iter()
            .filter(|notification| notification.user_id == user_id)
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    pub fn unread_count(&self, user_id: Uuid) -> usize {
        self.read_collection::<Notification>(store::NOTIFICATIONS)
            .iter()
            .filter(|notification| notification.user_id == user_id && !notification.read)
            .count()
    }

    /// Flags a notification as read. A notification addressed to someone
    /// else is reported as missing rather than revealed.
    pub fn mark_notification_read(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Notification, AppError> {
        let _guard = self.lock();
        let mut notifications: Vec<Notification> = self.read_collection(store::NOTIFICATIONS);

        let notification = notifications
            .iter_mut()
            .find(|notification| notification.id == id && notification.user_id == user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Notification with id '{id}' was not found"))
            })?;
        notification.read = true;
        let updated = notification.clone();

        self.write_collection(store::NOTIFICATIONS, &notifications)?;
        Ok(updated)
    }
}
