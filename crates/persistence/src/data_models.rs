// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

/// Administrator account as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminData {
    pub admin_id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// Login session as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub admin_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A database backup file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Sort order for student listings.
///
/// Every order ends with name then id, so ties are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentOrder {
    /// Full name, then id.
    #[default]
    Name,
    /// Class label, then name.
    Class,
    /// Class teacher, then name.
    Teacher,
}

impl StudentOrder {
    /// Parses the `name`, `class` or `teacher` keyword, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "class" => Some(Self::Class),
            "teacher" => Some(Self::Teacher),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Class => "class",
            Self::Teacher => "teacher",
        }
    }
}

/// Optional restrictions for [`crate::Persistence::list_students`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Exact class label.
    pub class_name: Option<String>,
    /// Case-insensitive substring of the full name.
    pub search: Option<String>,
    pub order: StudentOrder,
}

impl StudentFilter {
    /// Filter on a single class.
    #[must_use]
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn ordered_by(mut self, order: StudentOrder) -> Self {
        self.order = order;
        self
    }

    /// Adds a name search term. Blank terms are ignored.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term: String = term.into();
        let term: &str = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }
}
