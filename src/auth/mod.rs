//! Identity provider boundary. The server never implements authentication
//! itself; it talks to whatever sits behind this trait and maps provider
//! failures onto a small fixed set of user-facing messages.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Role, User};

pub mod local;

pub use local::LocalIdentity;

/// Provider failures, each carrying the exact string shown to the user.
/// Anything the provider reports that we do not recognize collapses into
/// `Provider`, whose public message is a generic retry prompt; the inner
/// detail stays in the logs.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Email is already in use.")]
    EmailTaken,

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Password is too weak.")]
    WeakPassword,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Authentication failed. Please try again.")]
    Provider(String),
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

/// An authenticated session: the bearer token plus the user it resolves to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, request: SignUpRequest) -> Result<User, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError>;

    /// Resolves a bearer token; `None` for an unknown or expired session.
    async fn current_user(&self, token: &str) -> Result<Option<User>, IdentityError>;

    /// Records which club an admin administers, once it exists.
    async fn assign_club(&self, user_id: Uuid, club_id: Uuid) -> Result<(), IdentityError>;
}
