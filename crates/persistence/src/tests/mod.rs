// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod export_tests;
mod session_tests;

use achievement_log_domain::{AchievementDraft, StudentDraft};

use crate::Persistence;

/// In-memory store with a cheap bcrypt cost.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("in-memory database")
        .with_password_cost(4)
}

pub fn create_test_achievement(name: &str, participation_date: &str) -> AchievementDraft {
    AchievementDraft::parse(
        None,
        name,
        "District",
        "PrizeWinner",
        "25/26",
        participation_date,
    )
    .expect("valid achievement")
}

pub fn create_test_student(
    full_name: &str,
    class_name: &str,
    achievements: Vec<AchievementDraft>,
) -> StudentDraft {
    StudentDraft::new(full_name, class_name, "Petrova O.S.", achievements)
}
