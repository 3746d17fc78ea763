// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{AchievementDraft, StudentDraft, check_date_year};
use std::collections::HashSet;

/// Validates that a student's required fields are present.
///
/// This checks the scalar fields and every achievement draft. It does NOT
/// check that referenced achievement ids exist (that requires stored state).
///
/// # Errors
///
/// Returns an error if:
/// - The full name, class or class teacher is empty
/// - Any achievement name is empty
/// - Any participation year is outside `1..=9999`
/// - The same achievement id is referenced twice
pub fn validate_student_draft(draft: &StudentDraft) -> Result<(), DomainError> {
    require_non_empty("full name", &draft.full_name)?;
    require_non_empty("class", &draft.class_name)?;
    require_non_empty("class teacher", &draft.class_teacher)?;

    validate_achievement_drafts(&draft.achievements)
}

/// Validates a list of achievement drafts.
///
/// # Errors
///
/// Returns an error if any name is empty, a participation year is outside
/// `1..=9999`, or an id is repeated.
pub fn validate_achievement_drafts(drafts: &[AchievementDraft]) -> Result<(), DomainError> {
    let mut seen_ids: HashSet<i64> = HashSet::new();

    for draft in drafts {
        require_non_empty("achievement name", &draft.name)?;
        check_date_year(draft.participation_date)?;

        if let Some(id) = draft.achievement_id.filter(|id| !seen_ids.insert(*id)) {
            return Err(DomainError::DuplicateAchievementId(id));
        }
    }

    Ok(())
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(())
}
