//! User use-case service.
//!
//! # Responsibility
//! - Resolve login identities into persisted users.
//! - Own the key salt so callers never hash identities themselves.
//!
//! # Invariants
//! - Logged fields are user keys only; emails and OpenID strings stay out of
//!   logs.

use crate::config::KeySalt;
use crate::model::user::{User, UserKey, UserValidationError};
use crate::repo::common::{RepoError, RepoResult};
use crate::repo::user_repo::{UserRecord, UserRepository};
use log::info;

pub struct UserService<R: UserRepository> {
    repo: R,
    salt: KeySalt,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R, salt: KeySalt) -> Self {
        Self { repo, salt }
    }

    pub fn salt(&self) -> &KeySalt {
        &self.salt
    }

    /// Returns the stored user for this identity, creating it on first use.
    ///
    /// Idempotent: repeated calls return the same record and leave an
    /// existing `last_login` untouched.
    pub fn get_or_create(&self, user: &User) -> RepoResult<UserRecord> {
        let record = self.repo.get_or_insert_user(user, &self.salt)?;
        info!(
            "event=user_resolve module=service status=ok key={} kind={:?}",
            record.key,
            record.user.identity().map(|identity| identity.kind()).ok()
        );
        Ok(record)
    }

    /// Get-or-create followed by a write that refreshes `last_login`.
    pub fn record_login(&self, user: &User) -> RepoResult<UserRecord> {
        let stored = self.repo.get_or_insert_user(user, &self.salt)?;
        let record = self.repo.update_user(&stored.user, &self.salt)?;
        info!(
            "event=user_login module=service status=ok key={}",
            record.key
        );
        Ok(record)
    }

    /// Replaces the user's homepage link.
    pub fn set_url(&self, key: &UserKey, url: Option<String>) -> RepoResult<UserRecord> {
        let mut stored = self
            .repo
            .get_user(key)?
            .ok_or_else(|| RepoError::UserNotFound(key.clone()))?;
        stored.user.url = url.filter(|value| !value.trim().is_empty());
        self.repo.update_user(&stored.user, &self.salt)
    }

    pub fn get_by_key(&self, key: &UserKey) -> RepoResult<Option<UserRecord>> {
        self.repo.get_user(key)
    }

    /// Looks a user up by the `<key>` segment of a `/u/<key>` URL.
    pub fn get_by_profile_segment(&self, segment: &str) -> RepoResult<Option<UserRecord>> {
        let key = UserKey::parse(segment)?;
        self.repo.get_user(&key)
    }

    pub fn key_for(&self, user: &User) -> Result<UserKey, UserValidationError> {
        user.sha1_key(&self.salt)
    }

    pub fn profile_page_url(&self, user: &User) -> Result<String, UserValidationError> {
        user.profile_page_url(&self.salt)
    }
}
