// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for authenticated routes.
//!
//! Every route except `/login` takes a [`SessionAdmin`], so a request
//! without a live session is rejected before its handler runs.

use achievement_log_api::{AuthenticatedAdmin, AuthenticationService};
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{AppState, ErrorResponse};

/// Extractor for a logged-in administrator.
///
/// # Usage
///
/// ```ignore
/// async fn handler(session: SessionAdmin) -> Result<Json<T>, HttpError> {
///     info!(username = %session.admin.username, "...");
///     // session.token is the bearer token, needed for logout
/// }
/// ```
///
/// # Authentication Flow
///
/// 1. Extract the `Authorization: Bearer <token>` header
/// 2. Look the token up with `AuthenticationService::validate_session`
/// 3. Expired sessions are deleted and rejected
/// 4. Missing or inactive admins are rejected
/// 5. The session's last activity time is stamped
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - The Authorization header is missing or not a Bearer token
/// - The token is unknown or expired
/// - The admin is gone or inactive
pub struct SessionAdmin {
    pub admin: AuthenticatedAdmin,
    pub token: String,
}

impl FromRequestParts<AppState> for SessionAdmin {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header is not a Bearer token");
                SessionError::InvalidAuthorizationHeader
            })?;

        let mut persistence = state.persistence.lock().await;
        let admin: AuthenticatedAdmin = AuthenticationService::validate_session(
            &mut persistence,
            token,
        )
        .map_err(|e| {
            warn!(error = %e, "Session validation failed");
            SessionError::InvalidSession(e.to_string())
        })?;

        debug!(username = %admin.username, "Session validated");

        Ok(Self {
            admin,
            token: token.to_string(),
        })
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    MissingAuthorizationHeader,
    InvalidAuthorizationHeader,
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingAuthorizationHeader => String::from("Missing Authorization header"),
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => format!("Session validation failed: {reason}"),
        };

        ErrorResponse::new(message).into_status_response(StatusCode::UNAUTHORIZED)
    }
}
