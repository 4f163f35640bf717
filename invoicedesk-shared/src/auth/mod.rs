/// Authentication for dashboard users
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and constant-time verification
/// - [`credentials`]: Email/password check against stored users
/// - [`session`]: Signed session tokens issued after a successful sign-in
///
/// # Example
///
/// ```no_run
/// use std::collections::HashMap;
/// use invoicedesk_shared::auth::credentials::authenticate;
/// use invoicedesk_shared::auth::session::{create_session_token, SessionClaims};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let form = HashMap::from([
///     ("email".to_string(), "user@nextmail.com".to_string()),
///     ("password".to_string(), "123456".to_string()),
/// ]);
///
/// let user = authenticate(&pool, &form).await?;
/// let token = create_session_token(&SessionClaims::new(&user), "a-secret-of-at-least-32-characters")?;
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod password;
pub mod session;
