use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{require_user, AppState};
use crate::models::club::NewClub;
use crate::models::event::{EventWindow, NewEvent};
use crate::repository::ClubFilter;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn list_clubs(
    State(state): State<AppState>,
    Query(filter): Query<ClubFilter>,
) -> Result<Response, AppError> {
    let clubs = state.repository.list_clubs(&filter);
    Ok(success(clubs, "Clubs fetched").into_response())
}

pub async fn get_club(
    State(state): State<AppState>,
    Path(club_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let club = state.repository.get_club(club_id)?;
    Ok(success(club, "Club fetched").into_response())
}

pub async fn create_club(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewClub>,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let club = state.repository.create_club(payload, user.id)?;
    if user.club_id.is_none() {
        state.identity.assign_club(user.id, club.id).await?;
    }
    Ok(created(club, "Club created").into_response())
}

pub async fn club_stats(
    State(state): State<AppState>,
    Path(club_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let stats = state.repository.club_stats(club_id)?;
    Ok(success(stats, "Club stats computed").into_response())
}

#[derive(Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub when: EventWindow,
}

pub async fn list_events(
    State(state): State<AppState>,
    Path(club_id): Path<Uuid>,
    Query(query): Query<EventsQuery>,
) -> Result<Response, AppError> {
    let events = state.repository.list_events_for_club(club_id, query.when)?;
    Ok(success(events, "Events fetched").into_response())
}

/// Only the club's admin may publish events under it.
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(club_id): Path<Uuid>,
    Json(payload): Json<NewEvent>,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let club = state.repository.get_club(club_id)?;
    if club.admin_id != user.id {
        return Err(AppError::Forbidden(
            "Only the club admin can create events for this club".to_string(),
        ));
    }

    let event = state.repository.create_event(payload, club_id)?;
    Ok(created(event, "Event created").into_response())
}

pub async fn follow_club(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(club_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let club = state.repository.follow_club(club_id, user.id)?;
    Ok(success(club, "Club followed").into_response())
}

pub async fn unfollow_club(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(club_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let club = state.repository.unfollow_club(club_id, user.id)?;
    Ok(success(club, "Club unfollowed").into_response())
}

pub async fn my_clubs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = require_user(&state, &headers).await?;
    let clubs = state.repository.clubs_followed_by(user.id);
    Ok(success(clubs, "Followed clubs fetched").into_response())
}
