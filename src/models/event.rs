use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Free-form start time as entered on the form, e.g. "18:00".
    pub time: String,
    pub location: String,
    pub capacity: Option<u32>,
    pub image_url: Option<String>,
    pub registration_required: bool,
    pub registration_deadline: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub attendees: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// The instant the event's calendar day begins. Upcoming/past
    /// partitioning compares this against "now".
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.date.and_time(NaiveTime::MIN).and_utc()
    }
}

/// Event form payload exactly as submitted: capacity arrives as the raw
/// field text and tags as one comma-separated string. Validation turns
/// this into typed values or a map of field errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub registration_required: bool,
    #[serde(default)]
    pub registration_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Option<String>,
}

/// Which slice of a club's events to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventWindow {
    Upcoming,
    Past,
    #[default]
    All,
}
