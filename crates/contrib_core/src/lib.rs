//! Core data model for a contribution-tracking site.
//! Users, the projects they own, and the contributor links between them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{ConfigError, CoreConfig, KeySalt, DEFAULT_KEY_SALT};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::contributor::{Contributor, ContributorId, ContributorValidationError};
pub use model::project::{Project, ProjectValidationError};
pub use model::user::{
    derive_user_key, profile_page_url_for, GoogleAccount, Identity, IdentityKind, User, UserKey,
    UserValidationError,
};
pub use repo::common::{Clock, FixedClock, RepoError, RepoResult, SystemClock};
pub use repo::contributor_repo::{ContributorRepository, SqliteContributorRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRecord, UserRepository};
pub use service::contributor_service::ContributorService;
pub use service::project_service::ProjectService;
pub use service::user_service::UserService;
pub use session::{IdentityProvider, LogoutPlan, ResponseSink, SessionService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
