/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /login` - Exchange credentials for a session token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Form, Json};
use invoicedesk_shared::{
    auth::{
        credentials::authenticate,
        session::{create_session_token, SessionClaims},
    },
    invoices::mutations::INVOICES_PATH,
    models::user::User,
};
use serde::Serialize;
use std::collections::HashMap;

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token, sent back as `Authorization: Bearer <token>`
    pub token: String,

    /// Signed-in user (password never serialized)
    pub user: User,

    /// Where the client should navigate next (the invoice listing)
    pub redirect_to: String,
}

/// Sign in
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// email=user%40nextmail.com&password=123456
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: "Invalid credentials." (unknown email, wrong
///   password and malformed input are reported alike)
/// - `500 Internal Server Error`: "Something went wrong."
pub async fn login(
    State(state): State<AppState>,
    Form(raw): Form<HashMap<String, String>>,
) -> ApiResult<Json<LoginResponse>> {
    let user = authenticate(&state.db, &raw).await?;

    let ttl = state
        .config
        .session
        .ttl()
        .ok_or_else(|| ApiError::InternalError("Session lifetime out of range".to_string()))?;

    let claims = SessionClaims::with_expiration(&user, ttl);
    let token = create_session_token(&claims, state.session_secret())?;

    Ok(Json(LoginResponse {
        token,
        user,
        redirect_to: INVOICES_PATH.to_string(),
    }))
}
