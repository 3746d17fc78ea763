// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin account and session mutations.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{admin_users, sessions};
use crate::error::PersistenceError;
use crate::queries::admins::get_admin_by_username;

/// Creates an admin account and returns its id.
///
/// The username is trimmed. The password is stored as a bcrypt hash of
/// the given `cost`.
///
/// # Errors
///
/// Returns an error if the username is empty or already taken, or if
/// hashing or the insert fails.
pub fn create_admin(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
    cost: u32,
) -> Result<i64, PersistenceError> {
    let username: &str = username.trim();
    if username.is_empty() {
        return Err(achievement_log_domain::DomainError::EmptyField { field: "username" }.into());
    }

    info!("Creating admin with username: {}", username);

    let password_hash: String = bcrypt::hash(password, cost)?;

    let admin_id: i64 = conn.immediate_transaction(|conn| {
        if get_admin_by_username(conn, username)?.is_some() {
            return Err(PersistenceError::DuplicateUsername(username.to_string()));
        }

        diesel::insert_into(admin_users::table)
            .values((
                admin_users::username.eq(username),
                admin_users::password_hash.eq(&password_hash),
            ))
            .execute(conn)?;

        conn.get_last_insert_rowid()
    })?;

    info!(admin_id, "Admin created");
    Ok(admin_id)
}

/// Replaces an admin's password and drops all of its sessions.
///
/// # Errors
///
/// Returns an error if the admin does not exist or hashing or the update fails.
pub fn update_admin_password(
    conn: &mut SqliteConnection,
    admin_id: i64,
    new_password: &str,
    cost: u32,
) -> Result<(), PersistenceError> {
    info!(admin_id, "Updating admin password");

    let password_hash: String = bcrypt::hash(new_password, cost)?;

    conn.immediate_transaction(|conn| {
        let rows_affected: usize = diesel::update(admin_users::table)
            .filter(admin_users::id.eq(admin_id))
            .set(admin_users::password_hash.eq(&password_hash))
            .execute(conn)?;
        if rows_affected == 0 {
            return Err(PersistenceError::AdminNotFound(format!("id {admin_id}")));
        }

        let dropped: usize = diesel::delete(sessions::table)
            .filter(sessions::admin_id.eq(admin_id))
            .execute(conn)?;
        debug!(admin_id, dropped, "Invalidated sessions after password change");
        Ok(())
    })
}

/// Activates or deactivates an admin account.
///
/// # Errors
///
/// Returns an error if the admin does not exist or the update fails.
pub fn set_admin_active(
    conn: &mut SqliteConnection,
    admin_id: i64,
    active: bool,
) -> Result<(), PersistenceError> {
    info!(admin_id, active, "Setting admin active flag");

    let rows_affected: usize = diesel::update(admin_users::table)
        .filter(admin_users::id.eq(admin_id))
        .set(admin_users::is_active.eq(i32::from(active)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::AdminNotFound(format!("id {admin_id}")));
    }
    Ok(())
}

/// Stamps the admin's last login time.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut SqliteConnection, admin_id: i64) -> Result<(), PersistenceError> {
    debug!(admin_id, "Updating last_login_at");

    diesel::update(admin_users::table)
        .filter(admin_users::id.eq(admin_id))
        .set(admin_users::last_login_at.eq(sql::<Nullable<Text>>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Creates a session and returns its id.
///
/// `expires_at` uses the `YYYY-MM-DD HH:MM:SS` UTC format of
/// `CURRENT_TIMESTAMP` so expiry can be compared in SQL.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    admin_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::admin_id.eq(admin_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, admin_id, expires_at, "Session created");
    Ok(session_id)
}

/// Stamps a session's last activity time.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(sessions::table)
        .filter(sessions::id.eq(session_id))
        .set(sessions::last_activity_at.eq(sql::<Text>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::SessionNotFound);
    }
    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns [`PersistenceError::SessionNotFound`] if no session has this
/// token, or an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::SessionNotFound);
    }
    debug!("Deleted session by token");
    Ok(())
}

/// Deletes every session whose expiry has passed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.le(sql::<Text>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
