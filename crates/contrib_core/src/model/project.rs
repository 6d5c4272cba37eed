//! Project domain model.
//!
//! # Responsibility
//! - Describe a project that can be contributed to, with its metadata.
//!
//! # Invariants
//! - `name` is the primary key and a URL path segment; it is never empty and
//!   never contains `/`.
//! - Every project has exactly one owner, referenced by `UserKey`.
//! - Metadata fields default to empty strings, never `None`.

use crate::model::timestamp::short_date;
use crate::model::user::UserKey;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation errors for project records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyName,
    /// Name contains a character that cannot appear in a path segment.
    InvalidName(String),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name cannot be empty"),
            Self::InvalidName(name) => write!(f, "project name `{name}` must not contain `/`"),
        }
    }
}

impl Error for ProjectValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Canonical key name.
    pub name: String,
    /// Optional display override for `name`.
    pub pretty_name: Option<String>,
    /// Owning user.
    pub owner: UserKey,
    /// Unix epoch milliseconds of the last persisted edit.
    pub last_edit: Option<i64>,
    #[serde(default)]
    pub how_to: String,
    #[serde(default)]
    pub code_repo: String,
    #[serde(default)]
    pub home_page: String,
    #[serde(default)]
    pub bug_tracker: String,
    #[serde(default)]
    pub irc_channel: String,
    #[serde(default)]
    pub mailing_list: String,
}

impl Project {
    /// Creates an unsaved project with empty metadata.
    pub fn new(name: impl Into<String>, owner: UserKey) -> Self {
        Self {
            name: name.into(),
            pretty_name: None,
            owner,
            last_edit: None,
            how_to: String::new(),
            code_repo: String::new(),
            home_page: String::new(),
            bug_tracker: String::new(),
            irc_channel: String::new(),
            mailing_list: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `pretty_name` when set and non-empty, otherwise `name`.
    pub fn display_name(&self) -> &str {
        match self.pretty_name.as_deref() {
            Some(pretty) if !pretty.is_empty() => pretty,
            _ => &self.name,
        }
    }

    /// `YYYY-MM-DD` of the last edit, `None` for unsaved projects.
    pub fn last_edit_short(&self) -> Option<String> {
        self.last_edit.and_then(short_date)
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_project_name(&self.name)
    }
}

/// Checks a project key name.
pub fn validate_project_name(name: &str) -> Result<(), ProjectValidationError> {
    if name.trim().is_empty() {
        return Err(ProjectValidationError::EmptyName);
    }
    if name.contains('/') {
        return Err(ProjectValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}
