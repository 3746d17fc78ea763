// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for the student achievement log.
//!
//! Everything here is pure: parsing and validation of submitted fields,
//! the achievement reconciliation plan used when editing a student, the
//! export projection, and duplicate-student detection.

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

mod error;
mod export;
mod reconcile;
mod similarity;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use export::{EXPORT_COLUMNS, ExportRow, project_export_rows};
pub use reconcile::{AchievementChangePlan, plan_achievement_changes};
pub use similarity::{MAX_SIMILAR_STUDENTS, find_similar_students};
pub use types::{
    AcademicYear, Achievement, AchievementDraft, AchievementLevel, AchievementResult, Student,
    StudentDraft, format_date, format_timestamp, parse_date, parse_timestamp,
};
pub use validation::{validate_achievement_drafts, validate_student_draft};
