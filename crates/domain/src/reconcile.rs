// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Achievement set reconciliation.
//!
//! Editing a student replaces its achievement list wholesale from the
//! caller's point of view. Storage applies that as a diff keyed by
//! achievement id so that retained achievements keep their ids:
//!
//! - stored achievements absent from the desired list are deleted
//! - desired entries carrying an id are updated when any field changed
//! - desired entries without an id are inserted

use std::collections::{HashMap, HashSet};

use crate::error::DomainError;
use crate::types::{Achievement, AchievementDraft};

/// The storage operations needed to turn one achievement set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementChangePlan {
    /// Ids of stored achievements to delete.
    pub delete: Vec<i64>,
    /// Stored achievements whose fields change, keyed by id.
    pub update: Vec<(i64, AchievementDraft)>,
    /// New achievements to insert.
    pub insert: Vec<AchievementDraft>,
    /// Ids of stored achievements left untouched.
    pub unchanged: Vec<i64>,
}

impl AchievementChangePlan {
    /// Returns whether applying this plan would write anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty() && self.update.is_empty() && self.insert.is_empty()
    }
}

/// Computes the change plan from `existing` to `desired`.
///
/// Plan vectors follow the order of their source lists, so the result is
/// deterministic.
///
/// # Errors
///
/// Returns an error if `desired` references an id that is not in
/// `existing`, or references the same id twice.
pub fn plan_achievement_changes(
    existing: &[Achievement],
    desired: &[AchievementDraft],
) -> Result<AchievementChangePlan, DomainError> {
    let stored: HashMap<i64, &Achievement> = existing
        .iter()
        .map(|achievement| (achievement.achievement_id, achievement))
        .collect();

    let mut plan: AchievementChangePlan = AchievementChangePlan::default();
    let mut kept: HashSet<i64> = HashSet::new();

    for draft in desired {
        let Some(id) = draft.achievement_id else {
            plan.insert.push(draft.clone());
            continue;
        };

        let current: &Achievement = stored
            .get(&id)
            .copied()
            .ok_or(DomainError::UnknownAchievement { achievement_id: id })?;

        if !kept.insert(id) {
            return Err(DomainError::DuplicateAchievementId(id));
        }

        if current.matches_draft(draft) {
            plan.unchanged.push(id);
        } else {
            plan.update.push((id, draft.clone()));
        }
    }

    plan.delete = existing
        .iter()
        .map(|achievement| achievement.achievement_id)
        .filter(|id| !kept.contains(id))
        .collect();

    Ok(plan)
}
