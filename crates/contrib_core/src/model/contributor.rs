//! Contributor join record.
//!
//! A contributor links one user to one project and carries a freeform role.
//! Role values are labels only; nothing here interprets them.

use crate::model::project::{validate_project_name, ProjectValidationError};
use crate::model::user::UserKey;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ContributorId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributorValidationError {
    NilId,
    Project(ProjectValidationError),
}

impl Display for ContributorValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "contributor id must not be nil"),
            Self::Project(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContributorValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NilId => None,
            Self::Project(err) => Some(err),
        }
    }
}

/// A user-project tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: ContributorId,
    pub user: UserKey,
    /// Key name of the project.
    pub project: String,
    pub is_active: bool,
    /// e.g. "Founder".
    pub role: Option<String>,
}

impl Contributor {
    /// Creates an inactive, role-less link with a generated id.
    pub fn new(user: UserKey, project: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            project: project.into(),
            is_active: false,
            role: None,
        }
    }

    pub fn validate(&self) -> Result<(), ContributorValidationError> {
        if self.id.is_nil() {
            return Err(ContributorValidationError::NilId);
        }
        validate_project_name(&self.project).map_err(ContributorValidationError::Project)
    }
}
