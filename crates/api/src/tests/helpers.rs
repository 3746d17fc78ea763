// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use achievement_log_persistence::Persistence;

use crate::{AchievementPayload, AuthenticatedAdmin, StudentRequest};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap().with_password_cost(4)
}

pub fn create_test_admin() -> AuthenticatedAdmin {
    AuthenticatedAdmin {
        admin_id: 1,
        username: String::from("admin"),
    }
}

pub fn create_test_payload(name: &str, participation_date: &str) -> AchievementPayload {
    AchievementPayload {
        achievement_id: None,
        name: name.to_string(),
        level: String::from("District"),
        result: String::from("PrizeWinner"),
        academic_year: String::from("25/26"),
        participation_date: participation_date.to_string(),
    }
}

pub fn create_test_request(
    full_name: &str,
    class_name: &str,
    achievements: Vec<AchievementPayload>,
) -> StudentRequest {
    StudentRequest {
        full_name: full_name.to_string(),
        class_name: class_name.to_string(),
        class_teacher: String::from("Petrova O.S."),
        achievements,
    }
}
