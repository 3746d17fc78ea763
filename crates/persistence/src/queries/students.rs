// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student and achievement queries.
//!
//! Stored text columns are parsed back into domain types here. A value that
//! no longer parses is reported as [`PersistenceError::DataIntegrity`].

use std::collections::HashMap;

use achievement_log_domain::{
    AcademicYear, Achievement, AchievementLevel, AchievementResult, DomainError, Student,
    parse_date, parse_timestamp,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::StudentOrder;
use crate::diesel_schema::{achievements, students};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct StudentRow {
    id: i64,
    name: String,
    class_name: String,
    teacher: String,
    created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AchievementRow {
    id: i64,
    student_id: i64,
    name: String,
    level: String,
    outcome: String,
    academic_year: String,
    participation_date: String,
    created_at: String,
}

impl AchievementRow {
    fn into_achievement(self) -> Result<Achievement, PersistenceError> {
        let context: String = format!("achievement {}", self.id);
        let integrity = |e: DomainError| PersistenceError::integrity(&context, &e);

        Ok(Achievement {
            achievement_id: self.id,
            student_id: self.student_id,
            level: self.level.parse::<AchievementLevel>().map_err(integrity)?,
            result: self.outcome.parse::<AchievementResult>().map_err(integrity)?,
            academic_year: self.academic_year.parse::<AcademicYear>().map_err(integrity)?,
            participation_date: parse_date(&self.participation_date).map_err(integrity)?,
            created_at: parse_timestamp(&self.created_at).map_err(integrity)?,
            name: self.name,
        })
    }
}

impl StudentRow {
    fn into_student(self, achievements: Vec<Achievement>) -> Result<Student, PersistenceError> {
        let created_at = parse_timestamp(&self.created_at)
            .map_err(|e| PersistenceError::integrity(&format!("student {}", self.id), &e))?;

        Ok(Student {
            student_id: self.id,
            full_name: self.name,
            class_name: self.class_name,
            class_teacher: self.teacher,
            created_at,
            achievements,
        })
    }
}

/// Loads one student with achievements ordered by date, then id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
/// Returns `Ok(None)` if the student does not exist.
pub fn get_student(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Option<Student>, PersistenceError> {
    debug!(student_id, "Loading student");

    let Some(row) = students::table
        .filter(students::id.eq(student_id))
        .select(StudentRow::as_select())
        .first::<StudentRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let achievements: Vec<Achievement> = achievements::table
        .filter(achievements::student_id.eq(student_id))
        .order((
            achievements::participation_date.asc(),
            achievements::id.asc(),
        ))
        .select(AchievementRow::as_select())
        .load::<AchievementRow>(conn)?
        .into_iter()
        .map(AchievementRow::into_achievement)
        .collect::<Result<_, _>>()?;

    row.into_student(achievements).map(Some)
}

/// Loads students in `order`, each with ordered achievements.
///
/// `class_name` restricts the result to one class (exact match). Class and
/// teacher orders fall back to name, then id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn list_students(
    conn: &mut SqliteConnection,
    class_name: Option<&str>,
    order: StudentOrder,
) -> Result<Vec<Student>, PersistenceError> {
    debug!(?class_name, order = order.as_str(), "Listing students");

    let query = students::table
        .select(StudentRow::as_select())
        .into_boxed();
    let mut query = match order {
        StudentOrder::Name => query.order((students::name.asc(), students::id.asc())),
        StudentOrder::Class => query.order((
            students::class_name.asc(),
            students::name.asc(),
            students::id.asc(),
        )),
        StudentOrder::Teacher => query.order((
            students::teacher.asc(),
            students::name.asc(),
            students::id.asc(),
        )),
    };
    if let Some(class_name) = class_name {
        query = query.filter(students::class_name.eq(class_name));
    }
    let rows: Vec<StudentRow> = query.load(conn)?;

    let student_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut by_student: HashMap<i64, Vec<Achievement>> = HashMap::new();
    for row in achievements::table
        .filter(achievements::student_id.eq_any(student_ids))
        .order((
            achievements::participation_date.asc(),
            achievements::id.asc(),
        ))
        .select(AchievementRow::as_select())
        .load::<AchievementRow>(conn)?
    {
        let achievement: Achievement = row.into_achievement()?;
        by_student
            .entry(achievement.student_id)
            .or_default()
            .push(achievement);
    }

    rows.into_iter()
        .map(|row| {
            let achievements: Vec<Achievement> = by_student.remove(&row.id).unwrap_or_default();
            row.into_student(achievements)
        })
        .collect()
}

/// Returns the distinct class labels, sorted.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_classes(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(students::table
        .select(students::class_name)
        .distinct()
        .order(students::class_name.asc())
        .load(conn)?)
}

/// Returns the distinct class teacher names, sorted.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_teachers(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(students::table
        .select(students::teacher)
        .distinct()
        .order(students::teacher.asc())
        .load(conn)?)
}

/// Counts stored achievements across all students.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_achievements(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(achievements::table.count().get_result(conn)?)
}
