// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the student achievement log.
//!
//! Translates client requests into record store operations and store
//! results back into response DTOs. Nothing here knows about HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod export;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedAdmin, AuthenticationService, LoginOutcome};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use export::{export_filename, render_export_csv, write_export_csv};
pub use handlers::{
    create_backup, create_student, delete_student, ensure_initial_admin, export_csv,
    find_similar_students, get_student, list_backups, list_classes, list_students, list_teachers,
    login, logout, restore_backup, update_student,
};
pub use request_response::{
    AchievementInfo, AchievementPayload, BackupFileInfo, CreateBackupResponse,
    DeleteStudentResponse, ExportFile, ListBackupsResponse, ListClassesResponse,
    ListStudentsRequest, ListStudentsResponse, ListTeachersResponse, LoginRequest, LoginResponse,
    RestoreBackupRequest, RestoreBackupResponse, SimilarStudentsResponse, StudentInfo,
    StudentRequest,
};
