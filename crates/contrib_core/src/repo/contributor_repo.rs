//! Contributor repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist user-project links with their role metadata.
//!
//! # Invariants
//! - At most one contributor row exists per (user, project) pair.
//! - The user and project of a link are fixed after creation; only
//!   `is_active` and `role` change.

use crate::model::contributor::{Contributor, ContributorId};
use crate::model::user::UserKey;
use crate::repo::common::{
    bool_to_int, parse_bool, parse_user_key, project_exists, user_exists, RepoError, RepoResult,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const CONTRIBUTOR_SELECT_SQL: &str = "SELECT
    uuid,
    user_key,
    project_name,
    is_active,
    role
FROM contributors";

pub trait ContributorRepository {
    fn create_contributor(&self, contributor: &Contributor) -> RepoResult<ContributorId>;
    /// Writes `is_active` and `role`.
    fn update_contributor(&self, contributor: &Contributor) -> RepoResult<()>;
    fn get_contributor(&self, id: ContributorId) -> RepoResult<Option<Contributor>>;
    fn find_contributor(&self, user: &UserKey, project: &str)
        -> RepoResult<Option<Contributor>>;
    /// Sorted by user key.
    fn list_contributors_for_project(&self, project: &str) -> RepoResult<Vec<Contributor>>;
    /// Sorted by project name.
    fn list_contributors_for_user(&self, user: &UserKey) -> RepoResult<Vec<Contributor>>;
}

/// SQLite-backed contributor repository.
pub struct SqliteContributorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContributorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_many(&self, filter: &str, value: &str) -> RepoResult<Vec<Contributor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTRIBUTOR_SELECT_SQL} {filter}"))?;
        let mut rows = stmt.query([value])?;
        let mut contributors = Vec::new();
        while let Some(row) = rows.next()? {
            contributors.push(parse_contributor_row(row)?);
        }
        Ok(contributors)
    }
}

impl ContributorRepository for SqliteContributorRepository<'_> {
    fn create_contributor(&self, contributor: &Contributor) -> RepoResult<ContributorId> {
        contributor.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !user_exists(&tx, &contributor.user)? {
            return Err(RepoError::UserNotFound(contributor.user.clone()));
        }
        if !project_exists(&tx, &contributor.project)? {
            return Err(RepoError::ProjectNotFound(contributor.project.clone()));
        }

        let inserted = tx.execute(
            "INSERT INTO contributors (
                uuid,
                user_key,
                project_name,
                is_active,
                role
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT DO NOTHING;",
            params![
                contributor.id.to_string(),
                contributor.user.as_str(),
                contributor.project.as_str(),
                bool_to_int(contributor.is_active),
                contributor.role.as_deref(),
            ],
        )?;
        if inserted == 0 {
            return Err(RepoError::AlreadyExists(format!(
                "contributor {} on project `{}`",
                contributor.user, contributor.project
            )));
        }
        tx.commit()?;

        debug!(
            "event=contributor_create module=repo status=ok user={} active={}",
            contributor.user, contributor.is_active
        );
        Ok(contributor.id)
    }

    fn update_contributor(&self, contributor: &Contributor) -> RepoResult<()> {
        contributor.validate()?;

        let changed = self.conn.execute(
            "UPDATE contributors
             SET
                is_active = ?1,
                role = ?2
             WHERE uuid = ?3;",
            params![
                bool_to_int(contributor.is_active),
                contributor.role.as_deref(),
                contributor.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::ContributorNotFound(contributor.id));
        }

        Ok(())
    }

    fn get_contributor(&self, id: ContributorId) -> RepoResult<Option<Contributor>> {
        self.conn
            .query_row(
                &format!("{CONTRIBUTOR_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_contributor_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_contributor(
        &self,
        user: &UserKey,
        project: &str,
    ) -> RepoResult<Option<Contributor>> {
        self.conn
            .query_row(
                &format!("{CONTRIBUTOR_SELECT_SQL} WHERE user_key = ?1 AND project_name = ?2;"),
                params![user.as_str(), project],
                |row| Ok(parse_contributor_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_contributors_for_project(&self, project: &str) -> RepoResult<Vec<Contributor>> {
        self.query_many(
            "WHERE project_name = ?1 ORDER BY user_key ASC, uuid ASC;",
            project,
        )
    }

    fn list_contributors_for_user(&self, user: &UserKey) -> RepoResult<Vec<Contributor>> {
        self.query_many(
            "WHERE user_key = ?1 ORDER BY project_name ASC, uuid ASC;",
            user.as_str(),
        )
    }
}

fn parse_contributor_row(row: &Row<'_>) -> RepoResult<Contributor> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in contributors.uuid"))
    })?;
    let user_text: String = row.get("user_key")?;

    Ok(Contributor {
        id,
        user: parse_user_key(&user_text, "contributors.user_key")?,
        project: row.get("project_name")?,
        is_active: parse_bool(row.get("is_active")?, "contributors.is_active")?,
        role: row.get("role")?,
    })
}
