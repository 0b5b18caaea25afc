use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use super::{IdentityError, IdentityProvider, Session, SignUpRequest};
use crate::models::User;

const MIN_PASSWORD_LEN: usize = 6;

/// In-memory provider backing development and tests. Accounts and sessions
/// live for the life of the process; a hosted provider slots in behind the
/// same trait for anything beyond that.
#[derive(Default)]
pub struct LocalIdentity {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    passwords: HashMap<Uuid, String>,
    by_email: HashMap<String, Uuid>,
    sessions: HashMap<String, Uuid>,
}

impl LocalIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize_email(email: &str) -> Result<String, IdentityError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(IdentityError::InvalidEmail)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn sign_up(&self, request: SignUpRequest) -> Result<User, IdentityError> {
        let email = normalize_email(&request.email)?;
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        let mut inner = self.lock();
        if inner.by_email.contains_key(&email) {
            return Err(IdentityError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            display_name: request.display_name.trim().to_string(),
            role: request.role,
            followed_clubs: BTreeSet::new(),
            attending_events: BTreeSet::new(),
            club_id: None,
            created_at: Utc::now(),
        };

        inner.by_email.insert(email, user.id);
        inner.passwords.insert(user.id, request.password);
        inner.users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let email = normalize_email(email).map_err(|_| IdentityError::InvalidCredentials)?;

        let mut inner = self.lock();
        let user_id = *inner
            .by_email
            .get(&email)
            .ok_or(IdentityError::InvalidCredentials)?;
        let stored = inner
            .passwords
            .get(&user_id)
            .ok_or_else(|| IdentityError::Provider("password record missing".to_string()))?;
        if stored != password {
            return Err(IdentityError::InvalidCredentials);
        }

        let user = inner
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| IdentityError::Provider("user record missing".to_string()))?;
        let token = Uuid::new_v4().to_string();
        inner.sessions.insert(token.clone(), user_id);
        Ok(Session { token, user })
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        self.lock().sessions.remove(token);
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>, IdentityError> {
        let inner = self.lock();
        let user = inner
            .sessions
            .get(token)
            .and_then(|user_id| inner.users.get(user_id))
            .cloned();
        Ok(user)
    }

    async fn assign_club(&self, user_id: Uuid, club_id: Uuid) -> Result<(), IdentityError> {
        let mut inner = self.lock();
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| IdentityError::Provider(format!("unknown user {user_id}")))?;
        user.club_id = Some(club_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn signup(email: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: "hunter22".to_string(),
            display_name: "Sam Carter".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let identity = LocalIdentity::new();
        let user = identity.sign_up(signup("sam@campus.edu")).await.unwrap();
        assert_eq!(user.email, "sam@campus.edu");

        let session = identity.sign_in("sam@campus.edu", "hunter22").await.unwrap();
        assert_eq!(session.user.id, user.id);

        let resolved = identity.current_user(&session.token).await.unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let identity = LocalIdentity::new();
        identity.sign_up(signup("sam@campus.edu")).await.unwrap();

        let err = identity
            .sign_up(signup("SAM@campus.edu"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email is already in use.");
    }

    #[tokio::test]
    async fn test_short_password_is_too_weak() {
        let identity = LocalIdentity::new();
        let mut request = signup("sam@campus.edu");
        request.password = "12345".to_string();

        let err = identity.sign_up(request).await.unwrap_err();
        assert_eq!(err.to_string(), "Password is too weak.");
    }

    #[tokio::test]
    async fn test_malformed_email_is_rejected() {
        let identity = LocalIdentity::new();
        for email in ["", "no-at-sign", "x@", "@campus.edu", "x@nodot"] {
            let err = identity.sign_up(signup(email)).await.unwrap_err();
            assert_eq!(err.to_string(), "Invalid email address.", "email: {email}");
        }
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let identity = LocalIdentity::new();
        identity.sign_up(signup("sam@campus.edu")).await.unwrap();

        let err = identity
            .sign_in("sam@campus.edu", "wrong-pass")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password.");
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_the_token() {
        let identity = LocalIdentity::new();
        identity.sign_up(signup("sam@campus.edu")).await.unwrap();
        let session = identity.sign_in("sam@campus.edu", "hunter22").await.unwrap();

        identity.sign_out(&session.token).await.unwrap();
        assert!(identity.current_user(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assign_club_annotates_the_user() {
        let identity = LocalIdentity::new();
        let user = identity.sign_up(signup("sam@campus.edu")).await.unwrap();
        let club_id = Uuid::new_v4();

        identity.assign_club(user.id, club_id).await.unwrap();
        let session = identity.sign_in("sam@campus.edu", "hunter22").await.unwrap();
        assert_eq!(session.user.club_id, Some(club_id));
    }
}
