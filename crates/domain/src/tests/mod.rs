// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod reconcile;

use time::macros::{date, datetime};

use crate::{
    AcademicYear, Achievement, AchievementDraft, AchievementLevel, AchievementResult, Student,
};

pub fn create_test_draft(name: &str) -> AchievementDraft {
    AchievementDraft::new(
        name,
        AchievementLevel::District,
        AchievementResult::PrizeWinner,
        AcademicYear::new(25).unwrap(),
        date!(2025 - 11 - 10),
    )
}

pub fn create_test_achievement(
    achievement_id: i64,
    student_id: i64,
    name: &str,
    participation_date: time::Date,
) -> Achievement {
    Achievement {
        achievement_id,
        student_id,
        name: name.to_string(),
        level: AchievementLevel::District,
        result: AchievementResult::PrizeWinner,
        academic_year: AcademicYear::new(25).unwrap(),
        participation_date,
        created_at: datetime!(2025 - 11 - 12 08:30:00),
    }
}

pub fn create_test_student(
    student_id: i64,
    full_name: &str,
    class_name: &str,
    achievements: Vec<Achievement>,
) -> Student {
    Student {
        student_id,
        full_name: full_name.to_string(),
        class_name: class_name.to_string(),
        class_teacher: String::from("Petrova O.S."),
        created_at: datetime!(2025 - 09 - 01 10:15:00),
        achievements,
    }
}
