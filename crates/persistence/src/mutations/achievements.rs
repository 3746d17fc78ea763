// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Achievement row mutations.
//!
//! These run inside the caller's transaction and never open their own.

use achievement_log_domain::{AchievementChangePlan, AchievementDraft, format_date};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::achievements;
use crate::error::PersistenceError;

/// Inserts one achievement for `student_id` and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_achievement(
    conn: &mut SqliteConnection,
    student_id: i64,
    draft: &AchievementDraft,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(achievements::table)
        .values((
            achievements::student_id.eq(student_id),
            achievements::name.eq(&draft.name),
            achievements::level.eq(draft.level.as_str()),
            achievements::outcome.eq(draft.result.as_str()),
            achievements::academic_year.eq(draft.academic_year.to_string()),
            achievements::participation_date.eq(format_date(draft.participation_date)),
        ))
        .execute(conn)?;

    let achievement_id: i64 = conn.get_last_insert_rowid()?;
    debug!(student_id, achievement_id, "Inserted achievement");
    Ok(achievement_id)
}

/// Overwrites the editable fields of one achievement.
///
/// `created_at` and the owning student are left as stored.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_achievement(
    conn: &mut SqliteConnection,
    achievement_id: i64,
    draft: &AchievementDraft,
) -> Result<(), PersistenceError> {
    diesel::update(achievements::table)
        .filter(achievements::id.eq(achievement_id))
        .set((
            achievements::name.eq(&draft.name),
            achievements::level.eq(draft.level.as_str()),
            achievements::outcome.eq(draft.result.as_str()),
            achievements::academic_year.eq(draft.academic_year.to_string()),
            achievements::participation_date.eq(format_date(draft.participation_date)),
        ))
        .execute(conn)?;

    debug!(achievement_id, "Updated achievement");
    Ok(())
}

/// Applies a reconciliation plan to the achievements of `student_id`.
///
/// Deletes are scoped to the student so a stale plan cannot touch rows
/// owned by someone else.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn apply_change_plan(
    conn: &mut SqliteConnection,
    student_id: i64,
    plan: &AchievementChangePlan,
) -> Result<(), PersistenceError> {
    if !plan.delete.is_empty() {
        let removed: usize = diesel::delete(
            achievements::table
                .filter(achievements::student_id.eq(student_id))
                .filter(achievements::id.eq_any(&plan.delete)),
        )
        .execute(conn)?;
        debug!(student_id, removed, "Removed achievements");
    }

    for (achievement_id, draft) in &plan.update {
        update_achievement(conn, *achievement_id, draft)?;
    }

    for draft in &plan.insert {
        insert_achievement(conn, student_id, draft)?;
    }

    Ok(())
}
