// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::date;

use super::{create_test_achievement, create_test_draft};
use crate::{
    AchievementChangePlan, AchievementResult, DomainError, plan_achievement_changes,
};

#[test]
fn test_plan_from_empty_inserts_everything() {
    let desired = vec![create_test_draft("A"), create_test_draft("B")];

    let plan: AchievementChangePlan = plan_achievement_changes(&[], &desired).unwrap();

    assert_eq!(plan.insert.len(), 2);
    assert!(plan.delete.is_empty());
    assert!(plan.update.is_empty());
}

#[test]
fn test_plan_to_empty_deletes_everything() {
    let existing = vec![
        create_test_achievement(1, 10, "A", date!(2025 - 11 - 10)),
        create_test_achievement(2, 10, "B", date!(2025 - 11 - 10)),
    ];

    let plan: AchievementChangePlan = plan_achievement_changes(&existing, &[]).unwrap();

    assert_eq!(plan.delete, vec![1, 2]);
    assert!(plan.insert.is_empty());
}

#[test]
fn test_plan_keeps_unchanged_achievements() {
    let existing = vec![create_test_achievement(1, 10, "City Olympiad", date!(2025 - 11 - 10))];
    let desired = vec![create_test_draft("City Olympiad").with_id(1)];

    let plan: AchievementChangePlan = plan_achievement_changes(&existing, &desired).unwrap();

    assert_eq!(plan.unchanged, vec![1]);
    assert!(plan.is_noop());
}

#[test]
fn test_plan_updates_changed_fields_only() {
    let existing = vec![
        create_test_achievement(1, 10, "City Olympiad", date!(2025 - 11 - 10)),
        create_test_achievement(2, 10, "Regional Olympiad", date!(2025 - 11 - 10)),
    ];
    let mut changed = create_test_draft("City Olympiad").with_id(1);
    changed.result = AchievementResult::Winner;
    let desired = vec![changed.clone(), create_test_draft("Regional Olympiad").with_id(2)];

    let plan: AchievementChangePlan = plan_achievement_changes(&existing, &desired).unwrap();

    assert_eq!(plan.update, vec![(1, changed)]);
    assert_eq!(plan.unchanged, vec![2]);
    assert!(plan.delete.is_empty());
}

#[test]
fn test_plan_replaces_one_achievement_with_another() {
    let existing = vec![
        create_test_achievement(1, 10, "Keep", date!(2025 - 11 - 10)),
        create_test_achievement(2, 10, "Drop", date!(2025 - 11 - 10)),
    ];
    let desired = vec![create_test_draft("Keep").with_id(1), create_test_draft("New")];

    let plan: AchievementChangePlan = plan_achievement_changes(&existing, &desired).unwrap();

    assert_eq!(plan.delete, vec![2]);
    assert_eq!(plan.insert.len(), 1);
    assert_eq!(plan.insert[0].name, "New");
    assert_eq!(plan.unchanged, vec![1]);
}

#[test]
fn test_plan_rejects_foreign_achievement_id() {
    let existing = vec![create_test_achievement(1, 10, "A", date!(2025 - 11 - 10))];
    let desired = vec![create_test_draft("A").with_id(99)];

    assert_eq!(
        plan_achievement_changes(&existing, &desired),
        Err(DomainError::UnknownAchievement { achievement_id: 99 })
    );
}

#[test]
fn test_plan_rejects_repeated_id() {
    let existing = vec![create_test_achievement(1, 10, "A", date!(2025 - 11 - 10))];
    let desired = vec![
        create_test_draft("A").with_id(1),
        create_test_draft("A again").with_id(1),
    ];

    assert_eq!(
        plan_achievement_changes(&existing, &desired),
        Err(DomainError::DuplicateAchievementId(1))
    );
}
