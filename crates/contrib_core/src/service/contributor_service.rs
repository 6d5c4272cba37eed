//! Contributor use-case service.
//!
//! # Responsibility
//! - Link users to projects and maintain the link's role metadata.
//! - Dereference both ends of a link through their repositories.

use crate::model::contributor::{Contributor, ContributorId};
use crate::model::project::Project;
use crate::model::user::UserKey;
use crate::repo::common::{RepoError, RepoResult};
use crate::repo::contributor_repo::ContributorRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::user_repo::{UserRecord, UserRepository};
use log::info;

pub struct ContributorService<C, U, P>
where
    C: ContributorRepository,
    U: UserRepository,
    P: ProjectRepository,
{
    contributors: C,
    users: U,
    projects: P,
}

impl<C, U, P> ContributorService<C, U, P>
where
    C: ContributorRepository,
    U: UserRepository,
    P: ProjectRepository,
{
    pub fn new(contributors: C, users: U, projects: P) -> Self {
        Self {
            contributors,
            users,
            projects,
        }
    }

    /// Links `user` to `project`. A second link for the same pair fails with
    /// `AlreadyExists`.
    pub fn add_contributor(
        &self,
        user: &UserKey,
        project: &str,
        role: Option<String>,
        is_active: bool,
    ) -> RepoResult<Contributor> {
        let mut contributor = Contributor::new(user.clone(), project);
        contributor.role = role;
        contributor.is_active = is_active;
        self.contributors.create_contributor(&contributor)?;
        info!(
            "event=contributor_add module=service status=ok user={} active={}",
            user, is_active
        );
        Ok(contributor)
    }

    pub fn set_active(&self, id: ContributorId, is_active: bool) -> RepoResult<Contributor> {
        self.modify(id, |contributor| contributor.is_active = is_active)
    }

    pub fn set_role(&self, id: ContributorId, role: Option<String>) -> RepoResult<Contributor> {
        self.modify(id, |contributor| contributor.role = role)
    }

    pub fn get_contributor(&self, id: ContributorId) -> RepoResult<Option<Contributor>> {
        self.contributors.get_contributor(id)
    }

    pub fn find_contributor(
        &self,
        user: &UserKey,
        project: &str,
    ) -> RepoResult<Option<Contributor>> {
        self.contributors.find_contributor(user, project)
    }

    pub fn contributors_of_project(&self, project: &str) -> RepoResult<Vec<Contributor>> {
        self.contributors.list_contributors_for_project(project)
    }

    pub fn contributions_of_user(&self, user: &UserKey) -> RepoResult<Vec<Contributor>> {
        self.contributors.list_contributors_for_user(user)
    }

    pub fn user_of(&self, contributor: &Contributor) -> RepoResult<UserRecord> {
        self.users
            .get_user(&contributor.user)?
            .ok_or_else(|| RepoError::UserNotFound(contributor.user.clone()))
    }

    pub fn project_of(&self, contributor: &Contributor) -> RepoResult<Project> {
        self.projects
            .get_project(&contributor.project)?
            .ok_or_else(|| RepoError::ProjectNotFound(contributor.project.clone()))
    }

    fn modify(
        &self,
        id: ContributorId,
        change: impl FnOnce(&mut Contributor),
    ) -> RepoResult<Contributor> {
        let mut contributor = self
            .contributors
            .get_contributor(id)?
            .ok_or(RepoError::ContributorNotFound(id))?;
        change(&mut contributor);
        self.contributors.update_contributor(&contributor)?;
        Ok(contributor)
    }
}
