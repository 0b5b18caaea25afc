use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::auth::SignUpRequest;
use crate::models::club::NewClub;
use crate::models::{Club, Role, User};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpPayload {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl SignUpPayload {
    fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpPayload>,
) -> Result<Response, AppError> {
    let display_name = payload.display_name();
    let user = state
        .identity
        .sign_up(SignUpRequest {
            email: payload.email,
            password: payload.password,
            display_name,
            role: Role::User,
        })
        .await?;

    Ok(created(user, "Account created").into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignUpPayload {
    #[serde(flatten)]
    pub account: SignUpPayload,
    /// Optional club details; when present the club is registered in the
    /// same flow and linked back to the new admin.
    #[serde(default)]
    pub club: Option<NewClub>,
}

#[derive(Serialize)]
struct AdminSignUpResponse {
    user: User,
    club: Option<Club>,
}

pub async fn sign_up_admin(
    State(state): State<AppState>,
    Json(payload): Json<AdminSignUpPayload>,
) -> Result<Response, AppError> {
    let display_name = payload.account.display_name();
    let mut user = state
        .identity
        .sign_up(SignUpRequest {
            email: payload.account.email,
            password: payload.account.password,
            display_name,
            role: Role::Admin,
        })
        .await?;

    let club = match payload.club {
        Some(input) => {
            let club = state.repository.create_club(input, user.id)?;
            state.identity.assign_club(user.id, club.id).await?;
            user.club_id = Some(club.id);
            Some(club)
        }
        None => None,
    };

    Ok(created(AdminSignUpResponse { user, club }, "Admin account created").into_response())
}

#[derive(Deserialize)]
pub struct SignInPayload {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    token: String,
    user: User,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInPayload>,
) -> Result<Response, AppError> {
    let session = state
        .identity
        .sign_in(&payload.email, &payload.password)
        .await?;

    let response = SessionResponse {
        token: session.token,
        user: session.user,
    };
    Ok(success(response, "Signed in").into_response())
}

pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = super::bearer_token(&headers) {
        state.identity.sign_out(token).await?;
    }
    Ok(empty_success("Signed out").into_response())
}
