use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::models::User;
use crate::repository::Repository;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

pub mod auth;
pub mod clubs;
pub mod notifications;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
    pub identity: Arc<dyn IdentityProvider>,
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "unihub-api",
    };

    success(payload, "Health check successful").into_response()
}

#[derive(Serialize)]
struct VisitedPayload {
    visited: bool,
}

pub async fn visited(State(state): State<AppState>) -> Result<Response, AppError> {
    let payload = VisitedPayload {
        visited: state.repository.has_visited(),
    };
    Ok(success(payload, "Visited flag fetched").into_response())
}

pub async fn mark_visited(State(state): State<AppState>) -> Result<Response, AppError> {
    state.repository.mark_visited()?;
    Ok(empty_success("Visited flag set").into_response())
}

/// Resolves the bearer token on a request to a user, or answers 401.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))?;
    state
        .identity
        .current_user(token)
        .await?
        .ok_or_else(|| AppError::AuthError("Your session has expired. Please sign in again.".to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
    }
}
