// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers take an already-validated [`AuthenticatedAdmin`] where the
//! operation requires a login; session checks happen in the HTTP layer.

use std::path::Path;

use achievement_log_domain::{ExportRow, Student, StudentDraft};
use achievement_log_persistence::{
    BackupInfo, Persistence, StudentFilter, StudentOrder, is_backup_filename,
};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{info, warn};

use crate::auth::{AuthenticatedAdmin, AuthenticationService, LoginOutcome};
use crate::error::ApiError;
use crate::export::{export_filename, render_export_csv};
use crate::request_response::{
    BackupFileInfo, CreateBackupResponse, DeleteStudentResponse, ExportFile, ListBackupsResponse,
    ListClassesResponse, ListStudentsRequest, ListStudentsResponse, ListTeachersResponse,
    LoginRequest, LoginResponse, RestoreBackupRequest, RestoreBackupResponse,
    SimilarStudentsResponse, StudentInfo, StudentRequest,
};

// ============================================================================
// Authentication
// ============================================================================

/// Authenticates an admin and returns a session token.
///
/// # Errors
///
/// Returns [`ApiError::AuthenticationFailed`] on bad credentials.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_days: i64,
) -> Result<LoginResponse, ApiError> {
    let outcome: LoginOutcome = AuthenticationService::login(
        persistence,
        &request.username,
        &request.password,
        session_days,
    )?;

    Ok(LoginResponse {
        session_token: outcome.session_token,
        admin_id: outcome.admin.admin_id,
        username: outcome.admin.username,
        expires_at: outcome.expires_at,
    })
}

/// Ends the session identified by `session_token`.
///
/// # Errors
///
/// Returns [`ApiError::AuthenticationFailed`] if the session does not exist.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Creates the initial admin when none exists yet.
///
/// Returns the new admin id, or `None` if an admin was already present.
///
/// # Errors
///
/// Returns an error if the admin cannot be created.
pub fn ensure_initial_admin(
    persistence: &mut Persistence,
    username: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    if persistence.count_admins()? > 0 {
        return Ok(None);
    }
    let admin_id: i64 = persistence.create_admin(username, password)?;
    info!(admin_id, username, "Created initial admin");
    Ok(Some(admin_id))
}

// ============================================================================
// Students
// ============================================================================

/// Lists students, optionally for one class and/or matching a name search.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] for an unknown sort order, or an
/// error if the store cannot be read.
pub fn list_students(
    persistence: &mut Persistence,
    request: &ListStudentsRequest,
) -> Result<ListStudentsResponse, ApiError> {
    let order: StudentOrder = match non_blank(request.order.as_deref()) {
        None => StudentOrder::default(),
        Some(value) => StudentOrder::parse(value).ok_or_else(|| ApiError::InvalidInput {
            field: String::from("order"),
            message: format!("'{value}' is not one of name, class, teacher"),
        })?,
    };

    let mut filter: StudentFilter = StudentFilter::default().ordered_by(order);
    filter.class_name = non_blank(request.class.as_deref()).map(String::from);
    if let Some(term) = request.q.as_deref() {
        filter = filter.with_search(term);
    }

    let students: Vec<Student> = persistence.list_students(&filter)?;
    Ok(ListStudentsResponse {
        students: students.iter().map(StudentInfo::from).collect(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Retrieves one student.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if the student does not exist.
pub fn get_student(persistence: &mut Persistence, student_id: i64) -> Result<StudentInfo, ApiError> {
    let student: Student = persistence.get_student(student_id)?;
    Ok(StudentInfo::from(&student))
}

/// Creates a student with its achievements.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] if any field fails to parse or validate.
pub fn create_student(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    request: StudentRequest,
) -> Result<StudentInfo, ApiError> {
    let draft: StudentDraft = request.into_draft()?;
    let student: Student = persistence.create_student(&draft)?;

    info!(
        admin = %admin.username,
        student_id = student.student_id,
        "Student created"
    );
    Ok(StudentInfo::from(&student))
}

/// Replaces a student's fields and achievement list.
///
/// Achievements sent with their id keep it; those without one are added;
/// stored achievements not sent are removed.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] for an unknown student or an
/// achievement id it does not own, [`ApiError::InvalidInput`] on bad fields.
pub fn update_student(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    student_id: i64,
    request: StudentRequest,
) -> Result<StudentInfo, ApiError> {
    let draft: StudentDraft = request.into_draft()?;
    let student: Student = persistence.update_student(student_id, &draft)?;

    info!(admin = %admin.username, student_id, "Student updated");
    Ok(StudentInfo::from(&student))
}

/// Deletes a student and its achievements.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if the student does not exist.
pub fn delete_student(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    student_id: i64,
) -> Result<DeleteStudentResponse, ApiError> {
    persistence.delete_student(student_id)?;

    info!(admin = %admin.username, student_id, "Student deleted");
    Ok(DeleteStudentResponse {
        student_id,
        message: format!("Student {student_id} deleted"),
    })
}

/// Reports students that may duplicate a new entry.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn find_similar_students(
    persistence: &mut Persistence,
    full_name: &str,
    class_name: &str,
) -> Result<SimilarStudentsResponse, ApiError> {
    let students: Vec<Student> = persistence.find_similar_students(full_name, class_name)?;
    Ok(SimilarStudentsResponse {
        has_similar: !students.is_empty(),
        students: students.iter().map(StudentInfo::from).collect(),
    })
}

/// Lists class labels.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_classes(persistence: &mut Persistence) -> Result<ListClassesResponse, ApiError> {
    Ok(ListClassesResponse {
        classes: persistence.list_classes()?,
    })
}

/// Lists class teachers.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_teachers(persistence: &mut Persistence) -> Result<ListTeachersResponse, ApiError> {
    Ok(ListTeachersResponse {
        teachers: persistence.list_teachers()?,
    })
}

// ============================================================================
// Export
// ============================================================================

fn file_stamp() -> String {
    OffsetDateTime::now_utc()
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_default()
}

/// Renders the achievement export as CSV, optionally for one class.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if a stored record is malformed or the
/// CSV cannot be written.
pub fn export_csv(
    persistence: &mut Persistence,
    class_filter: Option<&str>,
) -> Result<ExportFile, ApiError> {
    let class_filter: Option<&str> = non_blank(class_filter);
    let rows: Vec<ExportRow> = persistence.export_rows(class_filter)?;

    Ok(ExportFile {
        filename: export_filename(class_filter, &file_stamp()),
        content: render_export_csv(&rows)?,
        row_count: rows.len(),
    })
}

// ============================================================================
// Backups
// ============================================================================

/// Lists backups in `backup_dir`, newest first.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_backups(backup_dir: &Path) -> Result<ListBackupsResponse, ApiError> {
    let backups: Vec<BackupInfo> = Persistence::list_backups(backup_dir)?;
    Ok(ListBackupsResponse {
        backups: backups.iter().map(BackupFileInfo::from).collect(),
    })
}

/// Takes a backup and prunes all but the newest `keep`.
///
/// # Errors
///
/// Returns an error if the backup cannot be written.
pub fn create_backup(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    backup_dir: &Path,
    keep: usize,
) -> Result<CreateBackupResponse, ApiError> {
    let backup: BackupInfo = persistence.create_backup(backup_dir)?;
    let removed: usize = match Persistence::cleanup_old_backups(backup_dir, keep) {
        Ok(removed) => removed,
        Err(e) => {
            warn!(error = %e, "Backup retention cleanup failed");
            0
        }
    };

    info!(admin = %admin.username, filename = %backup.filename, "Backup created");
    Ok(CreateBackupResponse {
        backup: BackupFileInfo::from(&backup),
        removed,
    })
}

/// Restores students and achievements from a named backup in `backup_dir`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] if the name is not a backup file name,
/// [`ApiError::ResourceNotFound`] if it does not exist.
pub fn restore_backup(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    backup_dir: &Path,
    request: &RestoreBackupRequest,
) -> Result<RestoreBackupResponse, ApiError> {
    let filename: &str = request.filename.trim();
    if !is_backup_filename(filename) {
        return Err(ApiError::InvalidInput {
            field: String::from("filename"),
            message: format!("'{filename}' is not a backup file name"),
        });
    }

    let safety: BackupInfo =
        persistence.restore_from_backup(&backup_dir.join(filename), backup_dir)?;

    info!(
        admin = %admin.username,
        restored_from = filename,
        safety = %safety.filename,
        "Backup restored"
    );
    Ok(RestoreBackupResponse {
        restored_from: filename.to_string(),
        safety_backup: BackupFileInfo::from(&safety),
        message: format!("Records restored from {filename}"),
    })
}
