// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication for the administrator.

use std::ops::RangeInclusive;

use achievement_log_domain::{format_timestamp, parse_timestamp};
use achievement_log_persistence::{AdminData, Persistence, PersistenceError, SessionData};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// An administrator whose session has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    pub admin_id: i64,
    pub username: String,
}

impl From<&AdminData> for AuthenticatedAdmin {
    fn from(admin: &AdminData) -> Self {
        Self {
            admin_id: admin.admin_id,
            username: admin.username.clone(),
        }
    }
}

/// A freshly created session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub session_token: String,
    pub admin: AuthenticatedAdmin,
    pub expires_at: String,
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime.
    pub const DEFAULT_SESSION_DAYS: i64 = 30;

    /// Accepted session lifetimes, in days.
    pub const SESSION_DAYS_RANGE: RangeInclusive<i64> = 1..=3650;

    /// Checks credentials and opens a session lasting `session_days`.
    ///
    /// Unknown usernames, wrong passwords and inactive accounts all fail
    /// with the same reason.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        username: &str,
        password: &str,
        session_days: i64,
    ) -> Result<LoginOutcome, AuthError> {
        let username: &str = username.trim();
        let rejected = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid username or password"),
        };

        let admin: AdminData = persistence
            .get_admin_by_username(username)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(rejected)?;

        if !admin.is_active {
            warn!(username, "Login attempt for inactive admin");
            return Err(rejected());
        }

        let password_matches: bool = Persistence::verify_password(password, &admin.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_matches {
            warn!(username, "Login attempt with wrong password");
            return Err(rejected());
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: String = Self::expiry_after_days(session_days);

        persistence
            .create_session(&session_token, admin.admin_id, &expires_at)
            .map_err(Self::map_persistence_error)?;
        persistence
            .update_last_login(admin.admin_id)
            .map_err(Self::map_persistence_error)?;

        info!(admin_id = admin.admin_id, username, "Admin logged in");

        Ok(LoginOutcome {
            session_token,
            admin: AuthenticatedAdmin::from(&admin),
            expires_at,
        })
    }

    /// Resolves a session token to its administrator and records activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, or the admin is
    /// gone or inactive.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedAdmin, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: PrimitiveDateTime =
            parse_timestamp(&session.expires_at).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;
        if Self::now() >= expires_at {
            debug!(session_id = session.session_id, "Session expired");
            match persistence.delete_session(session_token) {
                Ok(()) | Err(PersistenceError::SessionNotFound) => {}
                Err(e) => return Err(Self::map_persistence_error(e)),
            }
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let admin: AdminData = persistence
            .get_admin_by_id(session.admin_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Admin not found"),
            })?;
        if !admin.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Admin is inactive"),
            });
        }

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedAdmin::from(&admin))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if no such session exists.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;
        info!("Admin logged out");
        Ok(())
    }

    /// Current UTC time without an offset, matching stored timestamps.
    fn now() -> PrimitiveDateTime {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(now.date(), now.time())
    }

    fn expiry_after_days(session_days: i64) -> String {
        let session_days: i64 = session_days.clamp(
            *Self::SESSION_DAYS_RANGE.start(),
            *Self::SESSION_DAYS_RANGE.end(),
        );
        let expires_at: PrimitiveDateTime = Self::now()
            .checked_add(Duration::days(session_days))
            .unwrap_or(PrimitiveDateTime::MAX);
        format_timestamp(expires_at)
    }

    /// Generates a 256-bit random session token as hex.
    fn generate_session_token() -> String {
        (0..4)
            .map(|_| format!("{:016x}", rand::random::<u64>()))
            .collect()
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        if matches!(err, PersistenceError::SessionNotFound) {
            return AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            };
        }
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
