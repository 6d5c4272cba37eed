//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist users under their derived `UserKey`.
//! - Provide the atomic get-or-insert used on every login.
//!
//! # Invariants
//! - Write paths call `User::validate()` (through key derivation) first.
//! - `last_login` is set from the repository clock on every write.
//! - Get-or-insert never modifies an existing row.

use crate::config::KeySalt;
use crate::model::user::{GoogleAccount, User, UserKey};
use crate::repo::common::{parse_user_key, Clock, RepoError, RepoResult, SystemClock};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const USER_SELECT_SQL: &str = "SELECT
    key,
    google_email,
    openid_identity,
    url,
    last_login
FROM users";

/// A persisted user together with its primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub key: UserKey,
    pub user: User,
}

/// Repository interface for user persistence.
pub trait UserRepository {
    /// Returns the stored user for `user`'s key, inserting it when absent.
    ///
    /// Only identity fields are taken from `user` on insert.
    fn get_or_insert_user(&self, user: &User, salt: &KeySalt) -> RepoResult<UserRecord>;
    fn get_user(&self, key: &UserKey) -> RepoResult<Option<UserRecord>>;
    /// Writes mutable fields and refreshes `last_login`.
    fn update_user(&self, user: &User, salt: &KeySalt) -> RepoResult<UserRecord>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn, C = SystemClock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteUserRepository<'conn, C> {
    pub fn with_clock(conn: &'conn Connection, clock: C) -> Self {
        Self { conn, clock }
    }
}

impl<C: Clock> UserRepository for SqliteUserRepository<'_, C> {
    fn get_or_insert_user(&self, user: &User, salt: &KeySalt) -> RepoResult<UserRecord> {
        let key = user.sha1_key(salt)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT INTO users (
                key,
                google_email,
                openid_identity,
                url,
                last_login
            ) VALUES (?1, ?2, ?3, NULL, ?4)
            ON CONFLICT (key) DO NOTHING;",
            params![
                key.as_str(),
                user.google_user.as_ref().map(GoogleAccount::email),
                user.openid_user.as_deref(),
                self.clock.now_epoch_ms(),
            ],
        )?;
        let record = load_user(&tx, &key)?.ok_or_else(|| {
            RepoError::InvalidData(format!("user `{key}` missing after get-or-insert"))
        })?;
        tx.commit()?;

        debug!(
            "event=user_get_or_insert module=repo status=ok key={} inserted={}",
            key,
            inserted == 1
        );
        Ok(record)
    }

    fn get_user(&self, key: &UserKey) -> RepoResult<Option<UserRecord>> {
        load_user(self.conn, key)
    }

    fn update_user(&self, user: &User, salt: &KeySalt) -> RepoResult<UserRecord> {
        let key = user.sha1_key(salt)?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                url = ?1,
                last_login = ?2
             WHERE key = ?3;",
            params![user.url.as_deref(), self.clock.now_epoch_ms(), key.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::UserNotFound(key));
        }

        load_user(self.conn, &key)?.ok_or(RepoError::UserNotFound(key))
    }
}

fn load_user(conn: &Connection, key: &UserKey) -> RepoResult<Option<UserRecord>> {
    conn.query_row(
        &format!("{USER_SELECT_SQL} WHERE key = ?1;"),
        [key.as_str()],
        |row| Ok(parse_user_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<UserRecord> {
    let key_text: String = row.get("key")?;
    let key = parse_user_key(&key_text, "users.key")?;

    let user = User {
        google_user: row
            .get::<_, Option<String>>("google_email")?
            .map(GoogleAccount::new),
        openid_user: row.get("openid_identity")?,
        url: row.get("url")?,
        last_login: Some(row.get("last_login")?),
    };
    user.validate().map_err(|err| {
        RepoError::InvalidData(format!("user `{key_text}` has invalid identity: {err}"))
    })?;

    Ok(UserRecord { key, user })
}
