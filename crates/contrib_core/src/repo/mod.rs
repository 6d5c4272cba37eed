//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate models before persistence.
//! - Auto-updated timestamps are set explicitly from a `Clock` on write.
//! - Repository APIs return semantic errors (`*NotFound`, `AlreadyExists`) in
//!   addition to DB transport errors.

pub mod common;
pub mod contributor_repo;
pub mod project_repo;
pub mod user_repo;
