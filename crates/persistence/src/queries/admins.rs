// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin account and session queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{AdminData, SessionData};
use crate::diesel_schema::{admin_users, sessions};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = admin_users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AdminRow {
    id: i64,
    username: String,
    password_hash: String,
    is_active: i32,
    created_at: String,
    last_login_at: Option<String>,
}

impl From<AdminRow> for AdminData {
    fn from(row: AdminRow) -> Self {
        Self {
            admin_id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SessionRow {
    id: i64,
    session_token: String,
    admin_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl From<SessionRow> for SessionData {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.id,
            session_token: row.session_token,
            admin_id: row.admin_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

/// Retrieves an admin by exact username.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no admin has this username.
pub fn get_admin_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<AdminData>, PersistenceError> {
    debug!("Looking up admin by username: {}", username);

    Ok(admin_users::table
        .filter(admin_users::username.eq(username))
        .select(AdminRow::as_select())
        .first::<AdminRow>(conn)
        .optional()?
        .map(AdminData::from))
}

/// Retrieves an admin by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the admin does not exist.
pub fn get_admin_by_id(
    conn: &mut SqliteConnection,
    admin_id: i64,
) -> Result<Option<AdminData>, PersistenceError> {
    debug!(admin_id, "Looking up admin by id");

    Ok(admin_users::table
        .filter(admin_users::id.eq(admin_id))
        .select(AdminRow::as_select())
        .first::<AdminRow>(conn)
        .optional()?
        .map(AdminData::from))
}

/// Counts admin accounts, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_admins(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(admin_users::table.count().get_result(conn)?)
}

/// Retrieves a session by token, expired or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    Ok(sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first::<SessionRow>(conn)
        .optional()?
        .map(SessionData::from))
}

/// Checks a plain-text password against a bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    Ok(bcrypt::verify(password, password_hash)?)
}
