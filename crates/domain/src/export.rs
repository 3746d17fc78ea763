// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Export projection.
//!
//! Flattens students and their achievements into one row per
//! (student, achievement) pair for spreadsheet output. A student with no
//! achievements still produces exactly one row, with the achievement
//! columns left empty.

use time::{Date, PrimitiveDateTime};

use crate::types::{
    AcademicYear, Achievement, AchievementLevel, AchievementResult, Student, format_date,
};

/// Column names in export order.
pub const EXPORT_COLUMNS: [&str; 10] = [
    "student_id",
    "full_name",
    "class",
    "class_teacher",
    "achievement",
    "level",
    "result",
    "academic_year",
    "participation_date",
    "student_created",
];

/// One flattened export row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub student_id: i64,
    pub full_name: String,
    pub class_name: String,
    pub class_teacher: String,
    pub achievement_name: Option<String>,
    pub level: Option<AchievementLevel>,
    pub result: Option<AchievementResult>,
    pub academic_year: Option<AcademicYear>,
    pub participation_date: Option<Date>,
    pub student_created_at: PrimitiveDateTime,
}

impl ExportRow {
    fn for_student(student: &Student, achievement: Option<&Achievement>) -> Self {
        Self {
            student_id: student.student_id,
            full_name: student.full_name.clone(),
            class_name: student.class_name.clone(),
            class_teacher: student.class_teacher.clone(),
            achievement_name: achievement.map(|a| a.name.clone()),
            level: achievement.map(|a| a.level),
            result: achievement.map(|a| a.result),
            academic_year: achievement.map(|a| a.academic_year),
            participation_date: achievement.map(|a| a.participation_date),
            student_created_at: student.created_at,
        }
    }

    /// Renders the row as text cells in [`EXPORT_COLUMNS`] order.
    ///
    /// Empty achievement fields become empty strings.
    #[must_use]
    pub fn cells(&self) -> [String; 10] {
        [
            self.student_id.to_string(),
            self.full_name.clone(),
            self.class_name.clone(),
            self.class_teacher.clone(),
            self.achievement_name.clone().unwrap_or_default(),
            self.level.map(|l| l.as_str().to_string()).unwrap_or_default(),
            self.result.map(|r| r.as_str().to_string()).unwrap_or_default(),
            self.academic_year.map(|y| y.to_string()).unwrap_or_default(),
            self.participation_date.map(format_date).unwrap_or_default(),
            format_date(self.student_created_at.date()),
        ]
    }
}

/// Projects students into export rows.
///
/// Rows are ordered by student name (then id), and within a student by
/// participation date (then achievement id), regardless of input order.
#[must_use]
pub fn project_export_rows(students: &[Student]) -> Vec<ExportRow> {
    let mut ordered: Vec<&Student> = students.iter().collect();
    ordered.sort_by(|a, b| {
        a.full_name
            .cmp(&b.full_name)
            .then(a.student_id.cmp(&b.student_id))
    });

    let mut rows: Vec<ExportRow> = Vec::new();
    for student in ordered {
        if student.achievements.is_empty() {
            rows.push(ExportRow::for_student(student, None));
            continue;
        }

        let mut achievements: Vec<&Achievement> = student.achievements.iter().collect();
        achievements.sort_by_key(|a| (a.participation_date, a.achievement_id));

        rows.extend(
            achievements
                .into_iter()
                .map(|achievement| ExportRow::for_student(student, Some(achievement))),
        );
    }

    rows
}
