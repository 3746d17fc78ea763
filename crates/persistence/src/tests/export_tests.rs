// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Export projection over stored records.

use achievement_log_domain::{ExportRow, StudentDraft, format_date};

use super::{create_test_achievement, create_test_persistence, create_test_student};
use crate::Persistence;

fn seed(persistence: &mut Persistence) {
    persistence
        .create_student(&create_test_student(
            "Ivanov I.I.",
            "10А",
            vec![create_test_achievement("City Olympiad", "2025-11-10")],
        ))
        .unwrap();
    persistence
        .create_student(&create_test_student(
            "Abramov A.A.",
            "10Б",
            vec![
                create_test_achievement("Chess Cup", "2026-01-20"),
                create_test_achievement("Math Marathon", "2025-09-15"),
            ],
        ))
        .unwrap();
    persistence
        .create_student(&create_test_student("Sidorov S.S.", "10А", vec![]))
        .unwrap();
}

#[test]
fn test_row_count_is_achievements_plus_empty_students() {
    let mut persistence = create_test_persistence();
    seed(&mut persistence);

    let rows: Vec<ExportRow> = persistence.export_rows(None).unwrap();
    let achievements: usize = usize::try_from(persistence.count_achievements().unwrap()).unwrap();
    assert_eq!(rows.len(), achievements + 1);

    let order: Vec<(&str, Option<&str>)> = rows
        .iter()
        .map(|row| (row.full_name.as_str(), row.achievement_name.as_deref()))
        .collect();
    assert_eq!(
        order,
        [
            ("Abramov A.A.", Some("Math Marathon")),
            ("Abramov A.A.", Some("Chess Cup")),
            ("Ivanov I.I.", Some("City Olympiad")),
            ("Sidorov S.S.", None),
        ]
    );
}

#[test]
fn test_class_filter_is_exact() {
    let mut persistence = create_test_persistence();
    seed(&mut persistence);
    persistence
        .create_student(&StudentDraft::new("Kuznetsov K.K.", "10А1", "Orlova", vec![]))
        .unwrap();

    let rows: Vec<ExportRow> = persistence.export_rows(Some("10А")).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.class_name == "10А"));

    assert!(persistence.export_rows(Some("9Г")).unwrap().is_empty());
}

#[test]
fn test_single_achievement_scenario_exports_one_row() {
    let mut persistence = create_test_persistence();
    let student = persistence
        .create_student(&create_test_student(
            "Ivanov I.I.",
            "10А",
            vec![create_test_achievement("City Olympiad", "2025-11-10")],
        ))
        .unwrap();

    let rows: Vec<ExportRow> = persistence.export_rows(None).unwrap();
    assert_eq!(rows.len(), 1);

    let cells = rows[0].cells();
    assert_eq!(cells[0], student.student_id.to_string());
    assert_eq!(
        &cells[1..9],
        [
            "Ivanov I.I.",
            "10А",
            "Petrova O.S.",
            "City Olympiad",
            "District",
            "PrizeWinner",
            "25/26",
            "2025-11-10",
        ]
    );
    assert_eq!(cells[9], format_date(student.created_at.date()));
}
