//! Store contracts and their SQLite implementation.
//!
//! # Responsibility
//! - Define the company store, collection store and membership index seams.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Store APIs return semantic errors (`CollectionNotFound`,
//!   `DuplicateMembership`, ...) in addition to DB transport errors.
//! - Membership writes run inside one immediate transaction each.

pub mod collection_store;
pub mod company_store;
pub mod membership_index;
mod store;

pub use store::{Page, RepoError, RepoResult, SqliteStore};
