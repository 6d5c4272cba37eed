//! User domain model.
//!
//! # Responsibility
//! - Hold a user's global state, independent of any project.
//! - Derive the stable user key used as primary key and profile URL segment.
//!
//! # Invariants
//! - Exactly one of `google_user` / `openid_user` is set on a valid user.
//! - `UserKey` is always 8 lowercase hex characters.
//! - Key derivation never succeeds for a user without identity.
//!
//! # See also
//! - `config::KeySalt`

use crate::config::KeySalt;
use crate::model::timestamp::short_date;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of hex characters kept from the SHA-1 digest.
pub const USER_KEY_LEN: usize = 8;
/// Prefix of profile page URLs.
pub const PROFILE_PATH_PREFIX: &str = "/u/";
/// Shown when a record carries no identity at all.
pub const UNKNOWN_USER_LABEL: &str = "Unknown user type";

/// Validation errors for user identity and keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Neither google nor openid identity is set.
    MissingIdentity,
    /// Both identities are set; they are mutually exclusive.
    ConflictingIdentity,
    /// An identity is set but empty.
    EmptyIdentity,
    /// Value is not an 8-char lowercase hex user key.
    InvalidKey(String),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentity => write!(f, "user has neither google nor openid identity"),
            Self::ConflictingIdentity => {
                write!(f, "user has both google and openid identity set")
            }
            Self::EmptyIdentity => write!(f, "user identity cannot be empty"),
            Self::InvalidKey(value) => write!(
                f,
                "invalid user key `{value}`; expected {USER_KEY_LEN} lowercase hex characters"
            ),
        }
    }
}

impl Error for UserValidationError {}

/// Account object supplied by the Google identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleAccount {
    email: String,
}

impl GoogleAccount {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Which login provider vouched for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    Google,
    OpenId,
}

/// Borrowed view of the single identity set on a valid user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity<'a> {
    Google(&'a GoogleAccount),
    OpenId(&'a str),
}

impl<'a> Identity<'a> {
    pub fn kind(&self) -> IdentityKind {
        match self {
            Self::Google(_) => IdentityKind::Google,
            Self::OpenId(_) => IdentityKind::OpenId,
        }
    }

    /// The string that is hashed into the user key.
    pub fn key_source(&self) -> &'a str {
        match *self {
            Self::Google(account) => account.email(),
            Self::OpenId(identity) => identity,
        }
    }
}

/// Stable derived key of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserKey(String);

impl UserKey {
    /// Parses an existing key, e.g. a profile URL segment.
    pub fn parse(value: &str) -> Result<Self, UserValidationError> {
        let well_formed = value.len() == USER_KEY_LEN
            && value
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !well_formed {
            return Err(UserValidationError::InvalidKey(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserKey {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserKey> for String {
    fn from(value: UserKey) -> Self {
        value.0
    }
}

/// Hashes `identity + salt` with SHA-1 and keeps the first 8 hex chars.
///
/// Distinct identities truncating to the same key collide; callers accept
/// that risk.
pub fn derive_user_key(identity: &str, salt: &KeySalt) -> UserKey {
    let mut hasher = Sha1::new();
    hasher.update(identity.as_bytes());
    hasher.update(salt.as_str().as_bytes());
    let digest = hasher.finalize();
    UserKey(hex::encode(&digest[..USER_KEY_LEN / 2]))
}

/// A user's global state, not specific to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub google_user: Option<GoogleAccount>,
    pub openid_user: Option<String>,
    /// Free-form homepage link. Not indexed.
    pub url: Option<String>,
    /// Unix epoch milliseconds of the last persisted write.
    pub last_login: Option<i64>,
}

impl User {
    /// Creates an unsaved user backed by a Google account.
    pub fn from_google(email: impl Into<String>) -> Self {
        Self {
            google_user: Some(GoogleAccount::new(email)),
            openid_user: None,
            url: None,
            last_login: None,
        }
    }

    /// Creates an unsaved user backed by an OpenID identifier.
    pub fn from_openid(identity: impl Into<String>) -> Self {
        Self {
            google_user: None,
            openid_user: Some(identity.into()),
            url: None,
            last_login: None,
        }
    }

    /// Returns the single identity of this user.
    ///
    /// # Errors
    /// - `MissingIdentity` when neither field is set.
    /// - `ConflictingIdentity` when both are set.
    /// - `EmptyIdentity` when the set identity is an empty string.
    pub fn identity(&self) -> Result<Identity<'_>, UserValidationError> {
        let identity = match (&self.google_user, &self.openid_user) {
            (Some(_), Some(_)) => return Err(UserValidationError::ConflictingIdentity),
            (Some(account), None) => Identity::Google(account),
            (None, Some(openid)) => Identity::OpenId(openid.as_str()),
            (None, None) => return Err(UserValidationError::MissingIdentity),
        };
        if identity.key_source().trim().is_empty() {
            return Err(UserValidationError::EmptyIdentity);
        }
        Ok(identity)
    }

    /// Validates identity invariants before persistence.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        self.identity().map(|_| ())
    }

    /// Name for signed-in views: the email or the OpenID string.
    pub fn display_name(&self) -> &str {
        if let Some(account) = &self.google_user {
            return account.email();
        }
        if let Some(openid) = &self.openid_user {
            return openid;
        }
        UNKNOWN_USER_LABEL
    }

    /// Privacy-preserving name: `alice@example.com` becomes `alice@...`.
    pub fn public_name(&self) -> String {
        if let Some(account) = &self.google_user {
            let email = account.email();
            let visible = email.find('@').map_or("", |at| &email[..=at]);
            return format!("{visible}...");
        }
        if let Some(openid) = &self.openid_user {
            return openid.clone();
        }
        UNKNOWN_USER_LABEL.to_string()
    }

    /// Derived primary key of this user.
    ///
    /// # Errors
    /// Fails with the identity validation error when the user has no single
    /// usable identity.
    pub fn sha1_key(&self, salt: &KeySalt) -> Result<UserKey, UserValidationError> {
        let identity = self.identity()?;
        Ok(derive_user_key(identity.key_source(), salt))
    }

    /// Profile page path, `/u/<key>`.
    pub fn profile_page_url(&self, salt: &KeySalt) -> Result<String, UserValidationError> {
        Ok(profile_page_url_for(&self.sha1_key(salt)?))
    }

    /// `YYYY-MM-DD` of the last login, `None` for unsaved users.
    pub fn last_login_short(&self) -> Option<String> {
        self.last_login.and_then(short_date)
    }
}

/// Profile page path for an already-derived key.
pub fn profile_page_url_for(key: &UserKey) -> String {
    format!("{PROFILE_PATH_PREFIX}{key}")
}
