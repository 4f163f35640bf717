/// Credential check for dashboard sign-in
///
/// Given a submitted credential map (`email`, `password`), looks the user up
/// by exact email and verifies the password against the stored Argon2id
/// hash. Callers see two outcomes only: invalid credentials (never saying
/// whether the email or the password was wrong) or an unexpected fault.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use validator::Validate;

use super::password::{verify_password, PasswordError};
use crate::models::user::User;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// Verified against when the email is unknown. Must carry the same cost
/// parameters as [`hash_password`](super::password::hash_password).
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=65536,t=3,p=4$kQm3DQ2fQaOwFTcUzTLHPQ$sPPYgwl4IhhyqMsmHW6iPJgIVPd/1MUPC63jCuZkF98";

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or malformed credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// User lookup failed
    #[error("Failed to fetch user: {0}")]
    Lookup(#[from] sqlx::Error),

    /// Stored hash unusable
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Verification task did not complete
    #[error("Password verification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AuthError {
    /// Message safe to show on the sign-in form
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => INVALID_CREDENTIALS,
            _ => SOMETHING_WENT_WRONG,
        }
    }
}

/// Lookup of users by email
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
}

#[async_trait]
impl UserDirectory for PgPool {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        User::find_by_email(self, email).await
    }
}

/// Submitted sign-in credentials
#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6))]
    pub password: String,
}

impl Credentials {
    /// Reads `email` and `password` from a credential map
    pub fn from_map(raw: &HashMap<String, String>) -> Self {
        Self {
            email: raw.get("email").cloned().unwrap_or_default(),
            password: raw.get("password").cloned().unwrap_or_default(),
        }
    }
}

/// Authenticates a credential map
///
/// # Errors
///
/// - [`AuthError::InvalidCredentials`] when the map fails the credential
///   schema, the email is unknown, or the password does not match
/// - any other variant for faults (lookup failure, corrupt stored hash)
pub async fn authenticate<D>(directory: &D, raw: &HashMap<String, String>) -> Result<User, AuthError>
where
    D: UserDirectory + ?Sized,
{
    let credentials = Credentials::from_map(raw);
    if credentials.validate().is_err() {
        info!("Invalid credentials");
        return Err(AuthError::InvalidCredentials);
    }

    let user = directory
        .find_by_email(&credentials.email)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch user");
            AuthError::Lookup(e)
        })?;

    let hash = user
        .as_ref()
        .map_or_else(|| UNKNOWN_USER_HASH.to_string(), |user| user.password.clone());

    // Argon2 verification is CPU-bound
    let password = credentials.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;

    match user {
        Some(user) if matches => {
            info!(user_id = %user.id, "User authenticated");
            Ok(user)
        }
        _ => {
            info!("Invalid credentials");
            Err(AuthError::InvalidCredentials)
        }
    }
}
