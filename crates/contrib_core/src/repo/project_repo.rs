//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist projects under their explicit key name.
//! - Keep `last_edit` current on every write.
//!
//! # Invariants
//! - A project is only written when its owner exists.
//! - Creation never overwrites an existing project.

use crate::model::project::Project;
use crate::model::user::UserKey;
use crate::repo::common::{
    parse_user_key, project_exists, user_exists, Clock, RepoError, RepoResult, SystemClock,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const PROJECT_SELECT_SQL: &str = "SELECT
    name,
    pretty_name,
    owner_key,
    last_edit,
    how_to,
    code_repo,
    home_page,
    bug_tracker,
    irc_channel,
    mailing_list
FROM projects";

pub trait ProjectRepository {
    /// Inserts a new project and returns it with `last_edit` set.
    fn create_project(&self, project: &Project) -> RepoResult<Project>;
    /// Replaces all mutable fields and bumps `last_edit`.
    fn update_project(&self, project: &Project) -> RepoResult<Project>;
    fn get_project(&self, name: &str) -> RepoResult<Option<Project>>;
    /// Most recently edited first.
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    /// Sorted by name.
    fn list_projects_by_owner(&self, owner: &UserKey) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn, C = SystemClock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteProjectRepository<'conn, C> {
    pub fn with_clock(conn: &'conn Connection, clock: C) -> Self {
        Self { conn, clock }
    }
}

impl<C: Clock> ProjectRepository for SqliteProjectRepository<'_, C> {
    fn create_project(&self, project: &Project) -> RepoResult<Project> {
        project.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !user_exists(&tx, &project.owner)? {
            return Err(RepoError::UserNotFound(project.owner.clone()));
        }

        let now = self.clock.now_epoch_ms();
        let inserted = tx.execute(
            "INSERT INTO projects (
                name,
                pretty_name,
                owner_key,
                last_edit,
                how_to,
                code_repo,
                home_page,
                bug_tracker,
                irc_channel,
                mailing_list
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT (name) DO NOTHING;",
            params![
                project.name.as_str(),
                project.pretty_name.as_deref(),
                project.owner.as_str(),
                now,
                project.how_to.as_str(),
                project.code_repo.as_str(),
                project.home_page.as_str(),
                project.bug_tracker.as_str(),
                project.irc_channel.as_str(),
                project.mailing_list.as_str(),
            ],
        )?;
        if inserted == 0 {
            return Err(RepoError::AlreadyExists(format!(
                "project `{}`",
                project.name
            )));
        }
        tx.commit()?;

        debug!(
            "event=project_create module=repo status=ok owner={}",
            project.owner
        );
        Ok(Project {
            last_edit: Some(now),
            ..project.clone()
        })
    }

    fn update_project(&self, project: &Project) -> RepoResult<Project> {
        project.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !project_exists(&tx, &project.name)? {
            return Err(RepoError::ProjectNotFound(project.name.clone()));
        }
        if !user_exists(&tx, &project.owner)? {
            return Err(RepoError::UserNotFound(project.owner.clone()));
        }

        let now = self.clock.now_epoch_ms();
        tx.execute(
            "UPDATE projects
             SET
                pretty_name = ?2,
                owner_key = ?3,
                last_edit = ?4,
                how_to = ?5,
                code_repo = ?6,
                home_page = ?7,
                bug_tracker = ?8,
                irc_channel = ?9,
                mailing_list = ?10
             WHERE name = ?1;",
            params![
                project.name.as_str(),
                project.pretty_name.as_deref(),
                project.owner.as_str(),
                now,
                project.how_to.as_str(),
                project.code_repo.as_str(),
                project.home_page.as_str(),
                project.bug_tracker.as_str(),
                project.irc_channel.as_str(),
                project.mailing_list.as_str(),
            ],
        )?;
        tx.commit()?;

        Ok(Project {
            last_edit: Some(now),
            ..project.clone()
        })
    }

    fn get_project(&self, name: &str) -> RepoResult<Option<Project>> {
        self.conn
            .query_row(
                &format!("{PROJECT_SELECT_SQL} WHERE name = ?1;"),
                [name],
                |row| Ok(parse_project_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY last_edit DESC, name ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn list_projects_by_owner(&self, owner: &UserKey) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE owner_key = ?1 ORDER BY name ASC;"
        ))?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let owner_text: String = row.get("owner_key")?;
    let project = Project {
        name: row.get("name")?,
        pretty_name: row.get("pretty_name")?,
        owner: parse_user_key(&owner_text, "projects.owner_key")?,
        last_edit: Some(row.get("last_edit")?),
        how_to: row.get("how_to")?,
        code_repo: row.get("code_repo")?,
        home_page: row.get("home_page")?,
        bug_tracker: row.get("bug_tracker")?,
        irc_channel: row.get("irc_channel")?,
        mailing_list: row.get("mailing_list")?,
    };
    project
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("projects.name: {err}")))?;
    Ok(project)
}
