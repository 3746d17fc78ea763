// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use achievement_log_domain::DomainError;
use achievement_log_persistence::PersistenceError;
use tracing::error;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::EmptyField { field } => invalid(&field.replace(' ', "_"), &err),
        DomainError::InvalidLevel(_) => invalid("level", &err),
        DomainError::InvalidResult(_) => invalid("result", &err),
        DomainError::InvalidAcademicYear { .. } => invalid("academic_year", &err),
        DomainError::DateParseError { .. } => invalid("participation_date", &err),
        DomainError::TimestampParseError { .. } => invalid("timestamp", &err),
        DomainError::DuplicateAchievementId(_) => invalid("achievements", &err),
        DomainError::UnknownAchievement { achievement_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Achievement"),
            message: format!("Achievement {achievement_id} does not exist for this student"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Storage failures become [`ApiError::Internal`] and are logged here, since
/// their detail is not passed on to the client.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Validation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::StudentNotFound(student_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Student {student_id} does not exist"),
        },
        PersistenceError::AchievementNotFound {
            student_id,
            achievement_id,
        } => ApiError::ResourceNotFound {
            resource_type: String::from("Achievement"),
            message: format!("Achievement {achievement_id} does not belong to student {student_id}"),
        },
        PersistenceError::AdminNotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Admin"),
            message: msg,
        },
        PersistenceError::BackupNotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Backup"),
            message: msg,
        },
        PersistenceError::SessionNotFound => ApiError::AuthenticationFailed {
            reason: String::from("Invalid session token"),
        },
        PersistenceError::DuplicateUsername(username) => ApiError::InvalidInput {
            field: String::from("username"),
            message: format!("Username '{username}' is already taken"),
        },
        other => {
            error!(error = %other, category = ?other.category(), "Persistence failure");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}
