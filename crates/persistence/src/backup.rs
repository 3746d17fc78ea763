// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backups.
//!
//! Backups are complete copies of the database written with `VACUUM INTO`
//! and named `app_backup_YYYYMMDD_HHMMSS.db` (UTC). A restore replaces only
//! the student and achievement tables; admin accounts and sessions stay as
//! they are.

use std::fs;
use std::path::{Path, PathBuf};

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{info, warn};

use crate::data_models::BackupInfo;
use crate::error::PersistenceError;

pub const BACKUP_PREFIX: &str = "app_backup_";
pub const BACKUP_EXTENSION: &str = ".db";

/// Returns whether `filename` looks like a backup written by this module.
#[must_use]
pub fn is_backup_filename(filename: &str) -> bool {
    filename.starts_with(BACKUP_PREFIX)
        && filename.ends_with(BACKUP_EXTENSION)
        && !filename.contains(['/', '\\'])
        && filename.len() > BACKUP_PREFIX.len() + BACKUP_EXTENSION.len()
}

/// Renders a path as a single-quoted SQL string literal.
fn sql_path_literal(path: &Path) -> Result<String, PersistenceError> {
    let path: &str = path.to_str().ok_or_else(|| {
        PersistenceError::BackupFailed(format!("Path is not valid UTF-8: {}", path.display()))
    })?;
    Ok(format!("'{}'", path.replace('\'', "''")))
}

fn backup_info(path: PathBuf) -> Result<BackupInfo, PersistenceError> {
    let size_bytes: u64 = fs::metadata(&path)?.len();
    let filename: String = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    Ok(BackupInfo {
        filename,
        path,
        size_bytes,
    })
}

/// Picks an unused backup path in `dir` for the current UTC time.
fn next_backup_path(dir: &Path) -> Result<PathBuf, PersistenceError> {
    let stamp: String = OffsetDateTime::now_utc()
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .map_err(|e| PersistenceError::BackupFailed(e.to_string()))?;

    let mut candidate: PathBuf = dir.join(format!("{BACKUP_PREFIX}{stamp}{BACKUP_EXTENSION}"));
    let mut counter: u32 = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{BACKUP_PREFIX}{stamp}_{counter}{BACKUP_EXTENSION}"));
        counter += 1;
    }
    Ok(candidate)
}

/// Writes a full copy of the database into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or `VACUUM INTO` fails.
pub fn create_backup(
    conn: &mut SqliteConnection,
    dir: &Path,
) -> Result<BackupInfo, PersistenceError> {
    fs::create_dir_all(dir)?;
    let path: PathBuf = next_backup_path(dir)?;

    diesel::sql_query(format!("VACUUM INTO {}", sql_path_literal(&path)?))
        .execute(conn)
        .map_err(|e| PersistenceError::BackupFailed(e.to_string()))?;

    let info: BackupInfo = backup_info(path)?;
    info!(
        filename = %info.filename,
        size_bytes = info.size_bytes,
        "Created database backup"
    );
    Ok(info)
}

/// Lists backups in `dir`, newest first. A missing directory has none.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_backups(dir: &Path) -> Result<Vec<BackupInfo>, PersistenceError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut backups: Vec<BackupInfo> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry: fs::DirEntry = entry?;
        let is_backup: bool = entry
            .file_name()
            .to_str()
            .is_some_and(is_backup_filename);
        if is_backup && entry.file_type()?.is_file() {
            backups.push(backup_info(entry.path())?);
        }
    }

    backups.sort_by(|a, b| b.filename.cmp(&a.filename));
    Ok(backups)
}

/// Deletes all but the newest `keep` backups and returns how many went.
///
/// A file that cannot be removed is logged and skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn cleanup_old_backups(dir: &Path, keep: usize) -> Result<usize, PersistenceError> {
    let mut removed: usize = 0;
    for backup in list_backups(dir)?.into_iter().skip(keep) {
        match fs::remove_file(&backup.path) {
            Ok(()) => {
                info!(filename = %backup.filename, "Removed old backup");
                removed += 1;
            }
            Err(e) => warn!(filename = %backup.filename, error = %e, "Failed to remove old backup"),
        }
    }
    Ok(removed)
}

/// Replaces all students and achievements with those in `backup_path`.
///
/// The current state is first saved as a new backup in `dir`, which is
/// returned. The replacement runs in one `IMMEDIATE` transaction.
///
/// # Errors
///
/// Returns an error if the backup file does not exist, the safety backup
/// fails, or the backup file does not hold the expected tables.
pub fn restore_from_backup(
    conn: &mut SqliteConnection,
    backup_path: &Path,
    dir: &Path,
) -> Result<BackupInfo, PersistenceError> {
    if !backup_path.is_file() {
        return Err(PersistenceError::BackupNotFound(
            backup_path.display().to_string(),
        ));
    }

    let safety: BackupInfo = create_backup(conn, dir)?;
    info!(
        source = %backup_path.display(),
        safety = %safety.filename,
        "Restoring records from backup"
    );

    diesel::sql_query(format!(
        "ATTACH DATABASE {} AS restore_source",
        sql_path_literal(backup_path)?
    ))
    .execute(conn)
    .map_err(|e| PersistenceError::BackupFailed(e.to_string()))?;

    let copied: Result<(), PersistenceError> = conn.immediate_transaction(|conn| {
        diesel::sql_query("DELETE FROM achievements").execute(conn)?;
        diesel::sql_query("DELETE FROM students").execute(conn)?;
        diesel::sql_query(
            "INSERT INTO students (id, name, class, teacher, created_at) \
             SELECT id, name, class, teacher, created_at FROM restore_source.students",
        )
        .execute(conn)?;
        diesel::sql_query(
            "INSERT INTO achievements \
             (id, student_id, name, level, result, academic_year, date, created_at) \
             SELECT id, student_id, name, level, result, academic_year, date, created_at \
             FROM restore_source.achievements",
        )
        .execute(conn)?;
        Ok(())
    });

    let detached = diesel::sql_query("DETACH DATABASE restore_source").execute(conn);
    if let Err(e) = &detached {
        warn!(error = %e, "Failed to detach restore source");
    }

    copied.map_err(|e| PersistenceError::BackupFailed(format!("Restore failed: {e}")))?;
    info!("Restore completed");
    Ok(safety)
}
