//! Project use-case service.
//!
//! # Responsibility
//! - Create and edit projects on behalf of their owners.
//! - Resolve the owner reference explicitly through the user repository.

use crate::model::project::Project;
use crate::model::user::UserKey;
use crate::repo::common::{RepoError, RepoResult};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::user_repo::{UserRecord, UserRepository};
use log::info;

pub struct ProjectService<P: ProjectRepository, U: UserRepository> {
    projects: P,
    users: U,
}

impl<P: ProjectRepository, U: UserRepository> ProjectService<P, U> {
    pub fn new(projects: P, users: U) -> Self {
        Self { projects, users }
    }

    /// Creates a project under its explicit key name.
    ///
    /// Fails with `AlreadyExists` when the name is taken and `UserNotFound`
    /// when the owner has never logged in.
    pub fn create_project(&self, project: &Project) -> RepoResult<Project> {
        let created = self.projects.create_project(project)?;
        info!(
            "event=project_create module=service status=ok owner={}",
            created.owner
        );
        Ok(created)
    }

    pub fn edit_project(&self, project: &Project) -> RepoResult<Project> {
        self.projects.update_project(project)
    }

    pub fn get_project(&self, name: &str) -> RepoResult<Option<Project>> {
        self.projects.get_project(name)
    }

    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.projects.list_projects()
    }

    pub fn projects_owned_by(&self, owner: &UserKey) -> RepoResult<Vec<Project>> {
        self.projects.list_projects_by_owner(owner)
    }

    /// Loads the owning user of `project`.
    pub fn owner_of(&self, project: &Project) -> RepoResult<UserRecord> {
        self.users
            .get_user(&project.owner)?
            .ok_or_else(|| RepoError::UserNotFound(project.owner.clone()))
    }
}
