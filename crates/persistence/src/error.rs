// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use achievement_log_domain::DomainError;

/// Broad classification of a [`PersistenceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Submitted data failed field validation.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// Stored data could not be interpreted.
    DataIntegrity,
    /// A username or token collides with an existing one.
    Conflict,
    /// Database, filesystem or hashing failure.
    Storage,
}

/// Errors that can occur during persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Submitted fields failed domain validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] DomainError),
    /// The requested student does not exist.
    #[error("Student {0} not found")]
    StudentNotFound(i64),
    /// An edit referenced an achievement the student does not own.
    #[error("Achievement {achievement_id} not found for student {student_id}")]
    AchievementNotFound { student_id: i64, achievement_id: i64 },
    /// A stored record could not be parsed back into domain types.
    #[error("Stored record is malformed: {0}")]
    DataIntegrity(String),
    /// The requested admin account does not exist.
    #[error("Admin not found: {0}")]
    AdminNotFound(String),
    /// An admin with this username already exists.
    #[error("Admin username already taken: {0}")]
    DuplicateUsername(String),
    /// The requested session does not exist.
    #[error("Session not found")]
    SessionNotFound,
    /// Password hashing or verification failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    /// The requested backup file does not exist.
    #[error("Backup not found: {0}")]
    BackupNotFound(String),
    /// Creating, listing or restoring a backup failed.
    #[error("Backup operation failed: {0}")]
    BackupFailed(String),
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
}

impl PersistenceError {
    /// Returns the broad category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::StudentNotFound(_)
            | Self::AchievementNotFound { .. }
            | Self::AdminNotFound(_)
            | Self::SessionNotFound
            | Self::BackupNotFound(_) => ErrorCategory::NotFound,
            Self::DataIntegrity(_) => ErrorCategory::DataIntegrity,
            Self::DuplicateUsername(_) => ErrorCategory::Conflict,
            Self::PasswordHash(_)
            | Self::BackupFailed(_)
            | Self::DatabaseError(_)
            | Self::DatabaseConnectionFailed(_)
            | Self::MigrationFailed(_)
            | Self::QueryFailed(_)
            | Self::InitializationError(_)
            | Self::ForeignKeyEnforcementNotEnabled => ErrorCategory::Storage,
        }
    }

    /// Wraps a stored-field parse failure.
    pub(crate) fn integrity(context: &str, err: &DomainError) -> Self {
        Self::DataIntegrity(format!("{context}: {err}"))
    }
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for PersistenceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::BackupFailed(err.to_string())
    }
}
