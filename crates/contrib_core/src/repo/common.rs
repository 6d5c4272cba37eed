//! Error type, clock and row helpers shared by all repositories.

use crate::db::DbError;
use crate::model::contributor::{ContributorId, ContributorValidationError};
use crate::model::project::ProjectValidationError;
use crate::model::timestamp::now_epoch_ms;
use crate::model::user::{UserKey, UserValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    UserValidation(UserValidationError),
    ProjectValidation(ProjectValidationError),
    ContributorValidation(ContributorValidationError),
    Db(DbError),
    UserNotFound(UserKey),
    ProjectNotFound(String),
    ContributorNotFound(ContributorId),
    /// A record with the same unique key is already stored.
    AlreadyExists(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserValidation(err) => write!(f, "{err}"),
            Self::ProjectValidation(err) => write!(f, "{err}"),
            Self::ContributorValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UserNotFound(key) => write!(f, "user not found: {key}"),
            Self::ProjectNotFound(name) => write!(f, "project not found: {name}"),
            Self::ContributorNotFound(id) => write!(f, "contributor not found: {id}"),
            Self::AlreadyExists(what) => write!(f, "already exists: {what}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UserValidation(err) => Some(err),
            Self::ProjectValidation(err) => Some(err),
            Self::ContributorValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UserNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::ContributorNotFound(_)
            | Self::AlreadyExists(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::UserValidation(value)
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::ProjectValidation(value)
    }
}

impl From<ContributorValidationError> for RepoError {
    fn from(value: ContributorValidationError) -> Self {
        Self::ContributorValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Source of "now" for auto-updated timestamp columns.
pub trait Clock {
    /// Current time in Unix epoch milliseconds.
    fn now_epoch_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        now_epoch_ms()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_ms(&self) -> i64 {
        self.0
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn parse_user_key(value: &str, column: &str) -> RepoResult<UserKey> {
    UserKey::parse(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid user key `{value}` in {column}")))
}

pub(crate) fn user_exists(conn: &Connection, key: &UserKey) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE key = ?1);",
        [key.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn project_exists(conn: &Connection, name: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE name = ?1);",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
