// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use achievement_log_api::{
    ListClassesResponse, ListStudentsResponse, ListTeachersResponse, SimilarStudentsResponse,
    StudentInfo,
};
use axum::http::{StatusCode, header};
use serde_json::{Value, json};

use super::{
    achievement_body, create_test_app, login_token, read_json, read_text, send, student_body,
};

#[tokio::test]
async fn test_create_and_get_student() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body(
        "Ivanov Ivan Ivanovich",
        "10А",
        &[achievement_body("City Olympiad", "2025-11-10")],
    );
    let response = send(&app, "POST", "/students", Some(&token), Some(&body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: StudentInfo = read_json(response).await;

    let response = send(
        &app,
        "GET",
        &format!("/students/{}", created.student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: StudentInfo = read_json(response).await;

    assert_eq!(fetched, created);
    assert_eq!(fetched.full_name, "Ivanov Ivan Ivanovich");
    assert_eq!(fetched.class_name, "10А");
    assert_eq!(fetched.achievements.len(), 1);
    assert_eq!(fetched.achievements[0].participation_date, "2025-11-10");
}

#[tokio::test]
async fn test_create_student_with_bad_academic_year_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let mut achievement: Value = achievement_body("City Olympiad", "2025-11-10");
    achievement["academic_year"] = json!("25/27");
    let body: Value = student_body("Ivanov Ivan", "10А", &[achievement]);

    let response = send(&app, "POST", "/students", Some(&token), Some(&body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_student_with_blank_name_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body("   ", "10А", &[]);
    let response = send(&app, "POST", "/students", Some(&token), Some(&body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_student_keeps_retained_achievement_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body(
        "Ivanov Ivan",
        "10А",
        &[
            achievement_body("City Olympiad", "2025-11-10"),
            achievement_body("Chess Cup", "2025-12-01"),
        ],
    );
    let response = send(&app, "POST", "/students", Some(&token), Some(&body)).await;
    let created: StudentInfo = read_json(response).await;
    let kept_id: i64 = created.achievements[0].achievement_id;

    let mut kept: Value = achievement_body("City Olympiad", "2025-11-10");
    kept["achievement_id"] = json!(kept_id);
    let update: Value = student_body(
        "Ivanov Ivan",
        "10Б",
        &[kept, achievement_body("Science Fair", "2026-02-15")],
    );
    let response = send(
        &app,
        "PUT",
        &format!("/students/{}", created.student_id),
        Some(&token),
        Some(&update),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated: StudentInfo = read_json(response).await;
    assert_eq!(updated.class_name, "10Б");
    let names: Vec<&str> = updated
        .achievements
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["City Olympiad", "Science Fair"]);
    assert_eq!(updated.achievements[0].achievement_id, kept_id);
}

#[tokio::test]
async fn test_update_missing_student_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body("Ivanov Ivan", "10А", &[]);
    let response = send(&app, "PUT", "/students/999", Some(&token), Some(&body)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_student_then_get_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body(
        "Ivanov Ivan",
        "10А",
        &[achievement_body("City Olympiad", "2025-11-10")],
    );
    let response = send(&app, "POST", "/students", Some(&token), Some(&body)).await;
    let created: StudentInfo = read_json(response).await;
    let uri: String = format!("/students/{}", created.student_id);

    let response = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_students_filters_by_class_and_search() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    for (name, class) in [
        ("Ivanov Ivan", "10А"),
        ("Petrov Petr", "10А"),
        ("Sidorov Sidor", "11Б"),
    ] {
        let body: Value = student_body(name, class, &[]);
        send(&app, "POST", "/students", Some(&token), Some(&body)).await;
    }

    let response = send(&app, "GET", "/students", Some(&token), None).await;
    let all: ListStudentsResponse = read_json(response).await;
    assert_eq!(all.students.len(), 3);

    let response = send(
        &app,
        "GET",
        "/students?class=10%D0%90",
        Some(&token),
        None,
    )
    .await;
    let class_only: ListStudentsResponse = read_json(response).await;
    assert_eq!(class_only.students.len(), 2);

    let response = send(&app, "GET", "/students?q=petrov", Some(&token), None).await;
    let searched: ListStudentsResponse = read_json(response).await;
    assert_eq!(searched.students.len(), 1);
    assert_eq!(searched.students[0].full_name, "Petrov Petr");
}

#[tokio::test]
async fn test_similar_students_reports_same_class_match() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body("Ivanov Ivan Ivanovich", "10A", &[]);
    send(&app, "POST", "/students", Some(&token), Some(&body)).await;

    let response = send(
        &app,
        "GET",
        "/students/similar?full_name=Ivanov%20Ivan&class_name=10A",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let similar: SimilarStudentsResponse = read_json(response).await;
    assert!(similar.has_similar);
    assert_eq!(similar.students.len(), 1);

    let response = send(
        &app,
        "GET",
        "/students/similar?full_name=Ivanov%20Ivan&class_name=11A",
        Some(&token),
        None,
    )
    .await;
    let other_class: SimilarStudentsResponse = read_json(response).await;
    assert!(!other_class.has_similar);
}

#[tokio::test]
async fn test_classes_and_teachers_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body("Ivanov Ivan", "10A", &[]);
    send(&app, "POST", "/students", Some(&token), Some(&body)).await;

    let response = send(&app, "GET", "/classes", Some(&token), None).await;
    let classes: ListClassesResponse = read_json(response).await;
    assert_eq!(classes.classes, vec![String::from("10A")]);

    let response = send(&app, "GET", "/teachers", Some(&token), None).await;
    let teachers: ListTeachersResponse = read_json(response).await;
    assert_eq!(teachers.teachers, vec![String::from("Petrova O.S.")]);
}

#[tokio::test]
async fn test_export_returns_csv_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body(
        "Ivanov I.I.",
        "10A",
        &[achievement_body("City Olympiad", "2025-11-10")],
    );
    send(&app, "POST", "/students", Some(&token), Some(&body)).await;
    let body: Value = student_body("Petrov P.P.", "11B", &[]);
    send(&app, "POST", "/students", Some(&token), Some(&body)).await;

    let response = send(&app, "GET", "/export?class=10A", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition: String = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"achievements_10A_"));

    let csv: String = read_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("student_id,full_name,class"));
    assert!(lines[1].contains("Ivanov I.I.,10A,Petrova O.S.,City Olympiad,District,PrizeWinner,25/26,2025-11-10"));
}

#[tokio::test]
async fn test_list_students_accepts_order_parameter() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    for (name, class, teacher) in [
        ("Abramov Anton", "11B", "Kuznetsova A.A."),
        ("Borisov Boris", "10A", "Smirnova E.V."),
        ("Vasiliev Vasily", "10A", "Kuznetsova A.A."),
    ] {
        let mut body: Value = student_body(name, class, &[]);
        body["class_teacher"] = json!(teacher);
        send(&app, "POST", "/students", Some(&token), Some(&body)).await;
    }

    let response = send(&app, "GET", "/students?order=class", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let by_class: ListStudentsResponse = read_json(response).await;
    let names: Vec<&str> = by_class
        .students
        .iter()
        .map(|s| s.full_name.as_str())
        .collect();
    assert_eq!(names, ["Borisov Boris", "Vasiliev Vasily", "Abramov Anton"]);

    let response = send(&app, "GET", "/students?order=teacher", Some(&token), None).await;
    let by_teacher: ListStudentsResponse = read_json(response).await;
    let names: Vec<&str> = by_teacher
        .students
        .iter()
        .map(|s| s.full_name.as_str())
        .collect();
    assert_eq!(names, ["Abramov Anton", "Vasiliev Vasily", "Borisov Boris"]);

    let response = send(&app, "GET", "/students?order=created", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signed_participation_year_is_rejected_and_listing_still_works() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path());
    let token: String = login_token(&app).await;

    let body: Value = student_body(
        "Ivanov Ivan",
        "10A",
        &[achievement_body("Old Cup", "-0012-01-01")],
    );
    let response = send(&app, "POST", "/students", Some(&token), Some(&body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/students", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed: ListStudentsResponse = read_json(response).await;
    assert!(listed.students.is_empty());

    let response = send(&app, "GET", "/export", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
