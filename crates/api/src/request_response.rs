// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use achievement_log_domain::{
    AcademicYear, Achievement, AchievementDraft, AchievementLevel, AchievementResult, Student,
    StudentDraft, format_date, format_timestamp,
};
use achievement_log_persistence::BackupInfo;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Token to send as `Authorization: Bearer <token>`.
    pub session_token: String,
    pub admin_id: i64,
    pub username: String,
    /// Expiry in `YYYY-MM-DD HH:MM:SS` (UTC).
    pub expires_at: String,
}

/// One achievement as submitted by the client.
///
/// Fields arrive as text and are parsed into domain types by
/// [`StudentRequest::into_draft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementPayload {
    /// Present when editing an achievement the student already has.
    #[serde(default)]
    pub achievement_id: Option<i64>,
    pub name: String,
    pub level: String,
    pub result: String,
    pub academic_year: String,
    /// `YYYY-MM-DD`.
    pub participation_date: String,
}

/// API request to create or replace a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRequest {
    pub full_name: String,
    pub class_name: String,
    pub class_teacher: String,
    #[serde(default)]
    pub achievements: Vec<AchievementPayload>,
}

impl StudentRequest {
    /// Parses the request into a validated-shape draft.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming the first field that fails
    /// to parse.
    pub fn into_draft(self) -> Result<StudentDraft, ApiError> {
        let achievements: Vec<AchievementDraft> = self
            .achievements
            .iter()
            .map(|payload| {
                AchievementDraft::parse(
                    payload.achievement_id,
                    &payload.name,
                    &payload.level,
                    &payload.result,
                    &payload.academic_year,
                    &payload.participation_date,
                )
            })
            .collect::<Result<_, _>>()?;

        Ok(StudentDraft::new(
            &self.full_name,
            &self.class_name,
            &self.class_teacher,
            achievements,
        ))
    }
}

/// An achievement in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementInfo {
    pub achievement_id: i64,
    pub name: String,
    pub level: AchievementLevel,
    pub result: AchievementResult,
    pub academic_year: AcademicYear,
    pub participation_date: String,
    pub created_at: String,
}

impl From<&Achievement> for AchievementInfo {
    fn from(achievement: &Achievement) -> Self {
        Self {
            achievement_id: achievement.achievement_id,
            name: achievement.name.clone(),
            level: achievement.level,
            result: achievement.result,
            academic_year: achievement.academic_year,
            participation_date: format_date(achievement.participation_date),
            created_at: format_timestamp(achievement.created_at),
        }
    }
}

/// A student with its achievements in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub student_id: i64,
    pub full_name: String,
    pub class_name: String,
    pub class_teacher: String,
    pub created_at: String,
    pub achievements: Vec<AchievementInfo>,
}

impl From<&Student> for StudentInfo {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.student_id,
            full_name: student.full_name.clone(),
            class_name: student.class_name.clone(),
            class_teacher: student.class_teacher.clone(),
            created_at: format_timestamp(student.created_at),
            achievements: student.achievements.iter().map(AchievementInfo::from).collect(),
        }
    }
}

/// Query for listing students. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStudentsRequest {
    /// Exact class label.
    #[serde(default)]
    pub class: Option<String>,
    /// Case-insensitive name search.
    #[serde(default)]
    pub q: Option<String>,
    /// `name` (default), `class` or `teacher`.
    #[serde(default)]
    pub order: Option<String>,
}

/// API response listing students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStudentsResponse {
    pub students: Vec<StudentInfo>,
}

/// API response for a possible-duplicate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarStudentsResponse {
    /// True when at least one candidate was found.
    pub has_similar: bool,
    pub students: Vec<StudentInfo>,
}

/// API response for a successful student deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteStudentResponse {
    pub student_id: i64,
    pub message: String,
}

/// API response listing class labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListClassesResponse {
    pub classes: Vec<String>,
}

/// API response listing class teachers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTeachersResponse {
    pub teachers: Vec<String>,
}

/// A backup file in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupFileInfo {
    pub filename: String,
    pub size_bytes: u64,
}

impl From<&BackupInfo> for BackupFileInfo {
    fn from(info: &BackupInfo) -> Self {
        Self {
            filename: info.filename.clone(),
            size_bytes: info.size_bytes,
        }
    }
}

/// API response listing backups, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBackupsResponse {
    pub backups: Vec<BackupFileInfo>,
}

/// API response for a successful backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBackupResponse {
    pub backup: BackupFileInfo,
    /// Old backups deleted by retention cleanup.
    pub removed: usize,
}

/// API request to restore from a backup in the backup directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreBackupRequest {
    pub filename: String,
}

/// API response for a successful restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreBackupResponse {
    pub restored_from: String,
    /// Backup of the state that was replaced.
    pub safety_backup: BackupFileInfo,
    pub message: String,
}

/// A rendered CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested download name.
    pub filename: String,
    pub content: Vec<u8>,
    pub row_count: usize,
}
