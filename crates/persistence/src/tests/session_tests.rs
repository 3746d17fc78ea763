// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session storage tests.

use super::create_test_persistence;
use crate::{ErrorCategory, PersistenceError};

#[test]
fn test_session_round_trip_and_delete() {
    let mut persistence = create_test_persistence();
    let admin_id = persistence.create_admin("admin", "pw").unwrap();
    let session_id = persistence
        .create_session("abc", admin_id, "2999-01-01 00:00:00")
        .unwrap();

    let session = persistence.get_session_by_token("abc").unwrap().unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.admin_id, admin_id);
    assert_eq!(session.expires_at, "2999-01-01 00:00:00");

    persistence.update_session_activity(session_id).unwrap();

    persistence.delete_session("abc").unwrap();
    assert!(persistence.get_session_by_token("abc").unwrap().is_none());
}

#[test]
fn test_missing_session_is_session_not_found() {
    let mut persistence = create_test_persistence();
    let admin_id = persistence.create_admin("admin", "pw").unwrap();
    let session_id = persistence
        .create_session("abc", admin_id, "2999-01-01 00:00:00")
        .unwrap();
    persistence.delete_session("abc").unwrap();

    let err = persistence.delete_session("abc").unwrap_err();
    assert!(matches!(err, PersistenceError::SessionNotFound));
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(matches!(
        persistence.update_session_activity(session_id),
        Err(PersistenceError::SessionNotFound)
    ));
}

#[test]
fn test_delete_expired_sessions_keeps_live_ones() {
    let mut persistence = create_test_persistence();
    let admin_id = persistence.create_admin("admin", "pw").unwrap();
    persistence
        .create_session("stale", admin_id, "2000-01-01 00:00:00")
        .unwrap();
    persistence
        .create_session("live", admin_id, "2999-01-01 00:00:00")
        .unwrap();

    assert_eq!(persistence.delete_expired_sessions().unwrap(), 1);
    assert!(persistence.get_session_by_token("stale").unwrap().is_none());
    assert!(persistence.get_session_by_token("live").unwrap().is_some());
}

#[test]
fn test_session_requires_existing_admin() {
    let mut persistence = create_test_persistence();
    assert!(
        persistence
            .create_session("orphan", 77, "2999-01-01 00:00:00")
            .is_err()
    );
}
