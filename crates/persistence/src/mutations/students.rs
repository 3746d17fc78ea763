// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student lifecycle mutations.
//!
//! Each operation runs in a single `IMMEDIATE` transaction: it applies
//! completely or leaves the stored state unchanged.

use achievement_log_domain::{
    AchievementChangePlan, DomainError, Student, StudentDraft, plan_achievement_changes,
    validate_student_draft,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::students;
use crate::error::PersistenceError;
use crate::mutations::achievements::{apply_change_plan, insert_achievement};
use crate::queries::students::get_student;

/// Creates a student with its achievements and returns the stored record.
///
/// # Errors
///
/// Returns a validation error if a required field is empty or a draft
/// carries an achievement id, or a database error if the insert fails.
pub fn create_student(
    conn: &mut SqliteConnection,
    draft: &StudentDraft,
) -> Result<Student, PersistenceError> {
    validate_student_draft(draft)?;
    // A new student owns nothing yet, so any referenced id is foreign.
    plan_achievement_changes(&[], &draft.achievements)?;

    let student: Student = conn.immediate_transaction(|conn| {
        diesel::insert_into(students::table)
            .values((
                students::name.eq(&draft.full_name),
                students::class_name.eq(&draft.class_name),
                students::teacher.eq(&draft.class_teacher),
            ))
            .execute(conn)?;
        let student_id: i64 = conn.get_last_insert_rowid()?;

        for achievement in &draft.achievements {
            insert_achievement(conn, student_id, achievement)?;
        }

        // Read back inside the transaction so a row that cannot be loaded
        // is never committed.
        get_student(conn, student_id)?.ok_or(PersistenceError::StudentNotFound(student_id))
    })?;

    info!(
        student_id = student.student_id,
        achievements = draft.achievements.len(),
        "Created student"
    );

    Ok(student)
}

/// Replaces a student's scalar fields and reconciles its achievements by id.
///
/// Achievements whose id is kept and whose fields are unchanged are not
/// written at all.
///
/// # Errors
///
/// Returns an error if:
/// - A required field is empty
/// - The student does not exist
/// - An achievement id does not belong to this student
/// - The database operation fails
pub fn update_student(
    conn: &mut SqliteConnection,
    student_id: i64,
    draft: &StudentDraft,
) -> Result<Student, PersistenceError> {
    validate_student_draft(draft)?;

    let (plan, student): (AchievementChangePlan, Student) = conn.immediate_transaction(|conn| {
        let current: Student =
            get_student(conn, student_id)?.ok_or(PersistenceError::StudentNotFound(student_id))?;

        let plan: AchievementChangePlan =
            plan_achievement_changes(&current.achievements, &draft.achievements).map_err(
                |err| match err {
                    DomainError::UnknownAchievement { achievement_id } => {
                        PersistenceError::AchievementNotFound {
                            student_id,
                            achievement_id,
                        }
                    }
                    other => PersistenceError::Validation(other),
                },
            )?;

        diesel::update(students::table)
            .filter(students::id.eq(student_id))
            .set((
                students::name.eq(&draft.full_name),
                students::class_name.eq(&draft.class_name),
                students::teacher.eq(&draft.class_teacher),
            ))
            .execute(conn)?;

        apply_change_plan(conn, student_id, &plan)?;

        let student: Student =
            get_student(conn, student_id)?.ok_or(PersistenceError::StudentNotFound(student_id))?;

        Ok::<_, PersistenceError>((plan, student))
    })?;

    info!(
        student_id,
        deleted = plan.delete.len(),
        updated = plan.update.len(),
        inserted = plan.insert.len(),
        unchanged = plan.unchanged.len(),
        "Updated student"
    );

    Ok(student)
}

/// Deletes a student. Achievements go with it through the foreign key cascade.
///
/// # Errors
///
/// Returns [`PersistenceError::StudentNotFound`] if no such student exists,
/// including when it was already deleted.
pub fn delete_student(conn: &mut SqliteConnection, student_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = conn.immediate_transaction(|conn| {
        diesel::delete(students::table.filter(students::id.eq(student_id))).execute(conn)
    })?;

    if rows_affected == 0 {
        return Err(PersistenceError::StudentNotFound(student_id));
    }

    info!(student_id, "Deleted student");
    Ok(())
}
