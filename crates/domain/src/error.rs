// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A required text field is empty after trimming.
    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        /// The name of the empty field.
        field: &'static str,
    },
    /// Achievement level is not one of the known levels.
    #[error("Invalid achievement level: '{0}'")]
    InvalidLevel(String),
    /// Achievement result is not one of the known results.
    #[error("Invalid achievement result: '{0}'")]
    InvalidResult(String),
    /// Academic year does not match the `YY/YY` pattern.
    #[error("Invalid academic year '{value}': {reason}")]
    InvalidAcademicYear {
        /// The rejected input.
        value: String,
        /// Why the input was rejected.
        reason: &'static str,
    },
    /// Failed to parse date from string.
    #[error("Failed to parse date '{date_string}': {error}")]
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a stored timestamp.
    #[error("Failed to parse timestamp '{value}': {error}")]
    TimestampParseError {
        /// The invalid timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// The same achievement id appears more than once in an edit.
    #[error("Achievement {0} appears more than once")]
    DuplicateAchievementId(i64),
    /// An edit references an achievement the student does not own.
    #[error("Achievement {achievement_id} does not belong to this student")]
    UnknownAchievement {
        /// The referenced achievement id.
        achievement_id: i64,
    },
}
