// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record store for the student achievement log.
//!
//! Built on Diesel with the `SQLite` backend. Migrations are embedded and
//! applied on open; foreign key enforcement is switched on and verified for
//! every connection, since achievement cleanup relies on `ON DELETE CASCADE`.
//!
//! ## Storage handles
//!
//! - [`Persistence::new_in_memory`] gives each call its own shared-cache
//!   in-memory database, for tests
//! - [`Persistence::new_with_file`] opens a file database in WAL mode
//!
//! ## Transactions
//!
//! Every student mutation runs in one `IMMEDIATE` transaction. Callers that
//! share a handle across tasks serialize access themselves.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use achievement_log_domain::{
    ExportRow, Student, StudentDraft, find_similar_students, project_export_rows,
};
use diesel::SqliteConnection;

mod backend;
mod backup;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backup::is_backup_filename;
pub use data_models::{AdminData, BackupInfo, SessionData, StudentFilter, StudentOrder};
pub use error::{ErrorCategory, PersistenceError};

use backend::PersistenceBackend;

/// Counter giving every in-memory database a distinct name.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// bcrypt cost used unless overridden.
pub const DEFAULT_PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;

/// Handle to the record store.
pub struct Persistence {
    conn: SqliteConnection,
    password_cost: u32,
}

impl Persistence {
    /// Opens a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            password_cost: DEFAULT_PASSWORD_COST,
        })
    }

    /// Opens (or creates) a file database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            password_cost: DEFAULT_PASSWORD_COST,
        })
    }

    /// Sets the bcrypt cost for passwords hashed from now on.
    #[must_use]
    pub const fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Students
    // ========================================================================

    /// Creates a student and its achievements.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Validation`] on bad fields, or a
    /// database error.
    pub fn create_student(&mut self, draft: &StudentDraft) -> Result<Student, PersistenceError> {
        mutations::students::create_student(&mut self.conn, draft)
    }

    /// Retrieves a student with achievements ordered by date, then id.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::StudentNotFound`] if the id is unknown.
    pub fn get_student(&mut self, student_id: i64) -> Result<Student, PersistenceError> {
        queries::students::get_student(&mut self.conn, student_id)?
            .ok_or(PersistenceError::StudentNotFound(student_id))
    }

    /// Lists students in the filter's order (name, then id, by default).
    ///
    /// The class filter is an exact match. The search term matches any part
    /// of the full name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored record is malformed.
    pub fn list_students(
        &mut self,
        filter: &StudentFilter,
    ) -> Result<Vec<Student>, PersistenceError> {
        let students: Vec<Student> = queries::students::list_students(
            &mut self.conn,
            filter.class_name.as_deref(),
            filter.order,
        )?;

        let Some(term) = filter.search.as_deref().map(str::to_lowercase) else {
            return Ok(students);
        };
        Ok(students
            .into_iter()
            .filter(|student| student.full_name.to_lowercase().contains(&term))
            .collect())
    }

    /// Replaces a student's fields and reconciles its achievements by id.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::StudentNotFound`] or
    /// [`PersistenceError::AchievementNotFound`] for unknown ids, and
    /// [`PersistenceError::Validation`] on bad fields.
    pub fn update_student(
        &mut self,
        student_id: i64,
        draft: &StudentDraft,
    ) -> Result<Student, PersistenceError> {
        mutations::students::update_student(&mut self.conn, student_id, draft)
    }

    /// Deletes a student and, by cascade, its achievements.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::StudentNotFound`] if the id is unknown.
    pub fn delete_student(&mut self, student_id: i64) -> Result<(), PersistenceError> {
        mutations::students::delete_student(&mut self.conn, student_id)
    }

    /// Returns distinct class labels, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_classes(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::students::list_classes(&mut self.conn)
    }

    /// Returns distinct class teacher names, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_teachers(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::students::list_teachers(&mut self.conn)
    }

    /// Counts achievements across all students.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_achievements(&mut self) -> Result<i64, PersistenceError> {
        queries::students::count_achievements(&mut self.conn)
    }

    /// Finds students in `class_name` that may duplicate `full_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored record is malformed.
    pub fn find_similar_students(
        &mut self,
        full_name: &str,
        class_name: &str,
    ) -> Result<Vec<Student>, PersistenceError> {
        let classmates: Vec<Student> = queries::students::list_students(
            &mut self.conn,
            Some(class_name.trim()),
            StudentOrder::Name,
        )?;
        Ok(find_similar_students(full_name, class_name, &classmates)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Flattens students into export rows, optionally for one class.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DataIntegrity`] if a stored record is
    /// malformed, or a database error.
    pub fn export_rows(
        &mut self,
        class_filter: Option<&str>,
    ) -> Result<Vec<ExportRow>, PersistenceError> {
        let students: Vec<Student> =
            queries::students::list_students(&mut self.conn, class_filter, StudentOrder::Name)?;
        Ok(project_export_rows(&students))
    }

    // ========================================================================
    // Admins
    // ========================================================================

    /// Creates an admin account.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicateUsername`] if the name is taken.
    pub fn create_admin(&mut self, username: &str, password: &str) -> Result<i64, PersistenceError> {
        mutations::admins::create_admin(&mut self.conn, username, password, self.password_cost)
    }

    /// Looks up an admin by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_admin_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<AdminData>, PersistenceError> {
        queries::admins::get_admin_by_username(&mut self.conn, username)
    }

    /// Looks up an admin by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_admin_by_id(&mut self, admin_id: i64) -> Result<Option<AdminData>, PersistenceError> {
        queries::admins::get_admin_by_id(&mut self.conn, admin_id)
    }

    /// Counts admin accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_admins(&mut self) -> Result<i64, PersistenceError> {
        queries::admins::count_admins(&mut self.conn)
    }

    /// Replaces an admin's password and ends its sessions.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::AdminNotFound`] if the id is unknown.
    pub fn update_admin_password(
        &mut self,
        admin_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::admins::update_admin_password(
            &mut self.conn,
            admin_id,
            new_password,
            self.password_cost,
        )
    }

    /// Activates or deactivates an admin.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::AdminNotFound`] if the id is unknown.
    pub fn set_admin_active(&mut self, admin_id: i64, active: bool) -> Result<(), PersistenceError> {
        mutations::admins::set_admin_active(&mut self.conn, admin_id, active)
    }

    /// Stamps an admin's last login time.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, admin_id: i64) -> Result<(), PersistenceError> {
        mutations::admins::update_last_login(&mut self.conn, admin_id)
    }

    /// Checks a password against a stored bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::admins::verify_password(password, password_hash)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session expiring at `expires_at` (`YYYY-MM-DD HH:MM:SS`, UTC).
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        admin_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::admins::create_session(&mut self.conn, session_token, admin_id, expires_at)
    }

    /// Looks up a session by token, whether or not it has expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::admins::get_session_by_token(&mut self.conn, session_token)
    }

    /// Stamps a session's last activity time.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::SessionNotFound`] if the session is gone,
    /// or an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::admins::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::SessionNotFound`] if no session has this
    /// token, or an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::admins::delete_session(&mut self.conn, session_token)
    }

    /// Deletes expired sessions and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::admins::delete_expired_sessions(&mut self.conn)
    }

    // ========================================================================
    // Backups
    // ========================================================================

    /// Writes a copy of the whole database into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BackupFailed`] if the copy fails.
    pub fn create_backup(&mut self, dir: &Path) -> Result<BackupInfo, PersistenceError> {
        backup::create_backup(&mut self.conn, dir)
    }

    /// Lists backups in `dir`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list_backups(dir: &Path) -> Result<Vec<BackupInfo>, PersistenceError> {
        backup::list_backups(dir)
    }

    /// Keeps only the newest `keep` backups in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn cleanup_old_backups(dir: &Path, keep: usize) -> Result<usize, PersistenceError> {
        backup::cleanup_old_backups(dir, keep)
    }

    /// Replaces students and achievements with a backup's contents.
    ///
    /// Returns the safety backup taken beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BackupNotFound`] if `backup_path` does not
    /// exist, or [`PersistenceError::BackupFailed`] if the restore fails.
    pub fn restore_from_backup(
        &mut self,
        backup_path: &Path,
        dir: &Path,
    ) -> Result<BackupInfo, PersistenceError> {
        backup::restore_from_backup(&mut self.conn, backup_path, dir)
    }
}
