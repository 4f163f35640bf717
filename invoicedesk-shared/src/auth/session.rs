/// Session tokens
///
/// A successful sign-in yields an HS256-signed JWT that the client presents
/// as `Authorization: Bearer <token>` on every dashboard request.
///
/// - **Issuer**: `invoicedesk`
/// - **Subject**: user ID
/// - **Lifetime**: 24 hours unless configured otherwise
///
/// # Example
///
/// ```
/// use invoicedesk_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
/// use invoicedesk_shared::models::user::User;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user = User {
///     id: Uuid::new_v4(),
///     name: "User".to_string(),
///     email: "user@nextmail.com".to_string(),
///     password: String::new(),
/// };
/// let secret = "a-secret-of-at-least-32-characters";
///
/// let token = create_session_token(&SessionClaims::new(&user), secret)?;
/// let claims = validate_session_token(&token, secret)?;
/// assert_eq!(claims.sub, user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Token issuer
pub const ISSUER: &str = "invoicedesk";

/// Default session lifetime
pub const DEFAULT_SESSION_HOURS: i64 = 24;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to sign token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Session has expired")]
    Expired,

    /// Signature, issuer or format check failed
    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Email of the signed-in user
    pub email: String,

    /// Issuer - always `invoicedesk`
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl SessionClaims {
    /// Claims for `user` with the default lifetime
    pub fn new(user: &User) -> Self {
        Self::with_expiration(user, Duration::hours(DEFAULT_SESSION_HOURS))
    }

    /// Claims for `user` expiring after `expires_in`
    pub fn with_expiration(user: &User, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id,
            email: user.email.clone(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }
}

/// Signs session claims
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| SessionError::CreateError(e.to_string()))
}

/// Verifies signature, issuer, expiry and not-before of a session token
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}
