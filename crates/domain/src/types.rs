// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

/// The level at which a competition or olympiad was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AchievementLevel {
    School,
    District,
    Regional,
    National,
    International,
}

impl AchievementLevel {
    /// All levels, from the narrowest to the widest.
    pub const ALL: [Self; 5] = [
        Self::School,
        Self::District,
        Self::Regional,
        Self::National,
        Self::International,
    ];

    /// Converts this level to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::School => "School",
            Self::District => "District",
            Self::Regional => "Regional",
            Self::National => "National",
            Self::International => "International",
        }
    }
}

impl FromStr for AchievementLevel {
    type Err = DomainError;

    /// Parses a level name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidLevel(s.to_string()))
    }
}

impl std::fmt::Display for AchievementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome a student obtained in a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AchievementResult {
    Participant,
    PrizeWinner,
    Winner,
}

impl AchievementResult {
    /// All results, from the weakest to the strongest.
    pub const ALL: [Self; 3] = [Self::Participant, Self::PrizeWinner, Self::Winner];

    /// Converts this result to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "Participant",
            Self::PrizeWinner => "PrizeWinner",
            Self::Winner => "Winner",
        }
    }
}

impl FromStr for AchievementResult {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        Self::ALL
            .into_iter()
            .find(|result| result.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidResult(s.to_string()))
    }
}

impl std::fmt::Display for AchievementResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A school year label such as `25/26`.
///
/// The second pair is always the first pair plus one. `99/00` is accepted
/// as the year that crosses a century boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear {
    /// Two-digit starting year (0..=99).
    start: u8,
}

impl AcademicYear {
    /// Creates an academic year from its two-digit starting year.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is greater than 99.
    pub fn new(start: u8) -> Result<Self, DomainError> {
        if start > 99 {
            return Err(DomainError::InvalidAcademicYear {
                value: start.to_string(),
                reason: "starting year must have two digits",
            });
        }
        Ok(Self { start })
    }

    /// Returns the two-digit starting year.
    #[must_use]
    pub const fn start(&self) -> u8 {
        self.start
    }

    /// Returns the two-digit ending year.
    #[must_use]
    pub const fn end(&self) -> u8 {
        (self.start + 1) % 100
    }
}

/// Parses exactly two ASCII digits.
fn parse_two_digits(part: &str) -> Option<u8> {
    if part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse::<u8>().ok()
    } else {
        None
    }
}

impl FromStr for AcademicYear {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &'static str| DomainError::InvalidAcademicYear {
            value: s.to_string(),
            reason,
        };

        let (first, second) = s.trim().split_once('/').ok_or_else(|| invalid("expected YY/YY"))?;
        let start: u8 = parse_two_digits(first).ok_or_else(|| invalid("expected YY/YY"))?;
        let end: u8 = parse_two_digits(second).ok_or_else(|| invalid("expected YY/YY"))?;

        let year: Self = Self { start };
        if year.end() != end {
            return Err(invalid("second year must follow the first"));
        }
        Ok(year)
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcademicYear> for String {
    fn from(value: AcademicYear) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{:02}", self.start, self.end())
    }
}

const MIN_DATE_YEAR: i32 = 1;
const MAX_DATE_YEAR: i32 = 9999;

/// Parses a participation date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date or its year
/// is signed or outside `1..=9999`.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    let trimmed: &str = value.trim();
    let invalid = |error: String| DomainError::DateParseError {
        date_string: value.to_string(),
        error,
    };

    // `[year]` accepts a leading sign; stored dates are always unsigned.
    if trimmed.starts_with(['+', '-']) {
        return Err(invalid(String::from("signed years are not accepted")));
    }

    let date: Date = Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map_err(|e| invalid(e.to_string()))?;
    check_date_year(date)?;
    Ok(date)
}

/// Rejects dates whose year does not render as four unsigned digits.
pub(crate) fn check_date_year(date: Date) -> Result<(), DomainError> {
    if (MIN_DATE_YEAR..=MAX_DATE_YEAR).contains(&date.year()) {
        return Ok(());
    }
    Err(DomainError::DateParseError {
        date_string: format_date(date),
        error: format!("year must be between {MIN_DATE_YEAR} and {MAX_DATE_YEAR}"),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parses a timestamp in the `YYYY-MM-DD HH:MM:SS` form `SQLite` produces
/// for `CURRENT_TIMESTAMP`.
///
/// # Errors
///
/// Returns an error if the string is not a valid timestamp.
pub fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .map_err(|e| DomainError::TimestampParseError {
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_timestamp(timestamp: PrimitiveDateTime) -> String {
    format!(
        "{} {:02}:{:02}:{:02}",
        format_date(timestamp.date()),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second()
    )
}

/// A validated achievement as submitted for creation or editing.
///
/// `achievement_id` is `Some` when the entry edits an existing achievement
/// and `None` when it should be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementDraft {
    pub achievement_id: Option<i64>,
    pub name: String,
    pub level: AchievementLevel,
    pub result: AchievementResult,
    pub academic_year: AcademicYear,
    pub participation_date: Date,
}

impl AchievementDraft {
    /// Creates a new achievement draft that will be inserted.
    ///
    /// The name is trimmed.
    #[must_use]
    pub fn new(
        name: &str,
        level: AchievementLevel,
        result: AchievementResult,
        academic_year: AcademicYear,
        participation_date: Date,
    ) -> Self {
        Self {
            achievement_id: None,
            name: name.trim().to_string(),
            level,
            result,
            academic_year,
            participation_date,
        }
    }

    /// Marks this draft as an edit of an existing achievement.
    #[must_use]
    pub const fn with_id(mut self, achievement_id: i64) -> Self {
        self.achievement_id = Some(achievement_id);
        self
    }

    /// Parses an achievement draft from raw form fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the level or result is not
    /// recognized, the academic year does not match `YY/YY`, or the date
    /// cannot be parsed.
    pub fn parse(
        achievement_id: Option<i64>,
        name: &str,
        level: &str,
        result: &str,
        academic_year: &str,
        participation_date: &str,
    ) -> Result<Self, DomainError> {
        let name: &str = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyField {
                field: "achievement name",
            });
        }

        Ok(Self {
            achievement_id,
            name: name.to_string(),
            level: level.parse()?,
            result: result.parse()?,
            academic_year: academic_year.parse()?,
            participation_date: parse_date(participation_date)?,
        })
    }
}

/// A student record as submitted for creation or editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub full_name: String,
    pub class_name: String,
    pub class_teacher: String,
    pub achievements: Vec<AchievementDraft>,
}

impl StudentDraft {
    /// Creates a new student draft, trimming the text fields.
    ///
    /// Field validation happens in [`crate::validate_student_draft`].
    #[must_use]
    pub fn new(
        full_name: &str,
        class_name: &str,
        class_teacher: &str,
        achievements: Vec<AchievementDraft>,
    ) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            class_name: class_name.trim().to_string(),
            class_teacher: class_teacher.trim().to_string(),
            achievements,
        }
    }
}

/// A persisted achievement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub achievement_id: i64,
    pub student_id: i64,
    pub name: String,
    pub level: AchievementLevel,
    pub result: AchievementResult,
    pub academic_year: AcademicYear,
    pub participation_date: Date,
    pub created_at: PrimitiveDateTime,
}

impl Achievement {
    /// Returns whether the editable fields equal those of `draft`.
    #[must_use]
    pub fn matches_draft(&self, draft: &AchievementDraft) -> bool {
        self.name == draft.name
            && self.level == draft.level
            && self.result == draft.result
            && self.academic_year == draft.academic_year
            && self.participation_date == draft.participation_date
    }
}

/// A persisted student together with its achievements.
///
/// Achievements are ordered by participation date, then by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub student_id: i64,
    pub full_name: String,
    pub class_name: String,
    pub class_teacher: String,
    pub created_at: PrimitiveDateTime,
    pub achievements: Vec<Achievement>,
}
