//! Form validation. Every rule is checked and every violation collected
//! before the caller is answered, so a form can mark all of its bad fields
//! in one round trip.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::club::NewClub;
use crate::models::event::NewEvent;

/// Field name to message, serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).copied()
    }

    fn set(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Event payload after validation, with the stringly form fields parsed.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub capacity: Option<u32>,
    pub image_url: Option<String>,
    pub registration_required: bool,
    pub registration_deadline: Option<NaiveDate>,
    pub tags: Vec<String>,
}

pub fn parse_capacity(raw: Option<&str>) -> Result<Option<u32>, ()> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<u32>().map(Some).map_err(|_| ()),
    }
}

fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Checks an event form against `today` (the past-date rule compares
/// calendar days, ignoring time of day). Returns the typed draft only when
/// no rule is violated.
pub fn validate_event(input: &NewEvent, today: NaiveDate) -> Result<EventDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    if input.title.trim().is_empty() {
        errors.set("title", "Title is required");
    }
    if input.description.trim().is_empty() {
        errors.set("description", "Description is required");
    }
    match input.date {
        None => errors.set("date", "Date is required"),
        Some(date) if date < today => errors.set("date", "Date cannot be in the past"),
        Some(_) => {}
    }
    if input.time.trim().is_empty() {
        errors.set("time", "Time is required");
    }
    if input.location.trim().is_empty() {
        errors.set("location", "Location is required");
    }

    let capacity = match parse_capacity(input.capacity.as_deref()) {
        Ok(capacity) => capacity,
        Err(()) => {
            errors.set("capacity", "Capacity must be a number");
            None
        }
    };

    if input.registration_required {
        match (input.registration_deadline, input.date) {
            (None, _) => errors.set(
                "registrationDeadline",
                "Registration deadline is required when registration is required",
            ),
            (Some(deadline), Some(date)) if deadline > date => errors.set(
                "registrationDeadline",
                "Registration deadline must be before the event date",
            ),
            _ => {}
        }
    }

    match (errors.is_empty(), input.date) {
        (true, Some(date)) => Ok(EventDraft {
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            date,
            time: input.time.trim().to_string(),
            location: input.location.trim().to_string(),
            capacity,
            image_url: input.image_url.clone().filter(|url| !url.trim().is_empty()),
            registration_required: input.registration_required,
            registration_deadline: input.registration_deadline,
            tags: parse_tags(input.tags.as_deref()),
        }),
        _ => Err(errors),
    }
}

/// The club form only insists on a name and a description; the category is
/// already constrained by its enum at deserialization time.
pub fn validate_club(input: &NewClub) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if input.name.trim().is_empty() {
        errors.set("name", "Name is required");
    }
    if input.description.trim().is_empty() {
        errors.set("description", "Description is required");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
