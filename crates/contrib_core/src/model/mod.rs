//! Domain model for users, projects and their contributors.
//!
//! # Responsibility
//! - Define the persisted record shapes and their derived accessors.
//! - Keep models free of I/O; persistence lives in `repo`, session side
//!   effects in `session`.
//!
//! # Invariants
//! - References between records are explicit keys (`UserKey`, project name),
//!   never lazily loaded objects.
//! - Timestamps are Unix epoch milliseconds set by repository write paths.

pub mod contributor;
pub mod project;
pub mod timestamp;
pub mod user;
