// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use crate::types::Student;

/// Maximum number of partial matches reported.
pub const MAX_SIMILAR_STUDENTS: usize = 5;

/// Splits a name into lowercase parts.
fn name_parts(name: &str) -> HashSet<String> {
    name.split_whitespace().map(str::to_lowercase).collect()
}

/// Finds students in `class_name` that may duplicate `full_name`.
///
/// Exact name matches win: if any exist, all of them are returned.
/// Otherwise, students sharing at least two name parts (case-insensitive)
/// are returned, at most [`MAX_SIMILAR_STUDENTS`]. A one-word name only
/// matches exactly.
#[must_use]
pub fn find_similar_students<'a>(
    full_name: &str,
    class_name: &str,
    students: &'a [Student],
) -> Vec<&'a Student> {
    let full_name: &str = full_name.trim();
    let class_name: &str = class_name.trim();
    if full_name.is_empty() {
        return Vec::new();
    }

    let same_class: Vec<&Student> = students
        .iter()
        .filter(|student| student.class_name == class_name)
        .collect();

    let exact: Vec<&Student> = same_class
        .iter()
        .copied()
        .filter(|student| student.full_name == full_name)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let wanted: HashSet<String> = name_parts(full_name);
    if wanted.len() < 2 {
        return Vec::new();
    }

    same_class
        .into_iter()
        .filter(|student| name_parts(&student.full_name).intersection(&wanted).count() >= 2)
        .take(MAX_SIMILAR_STUDENTS)
        .collect()
}
