//! Shared data contracts for companies, collections and memberships.
//!
//! # Invariants
//! - Companies are identified by integer ids owned by the company store.
//! - Collections are identified by stable UUIDs and carry unique names.
//! - `liked` on a company view is derived at read time, never persisted.

pub mod collection;
pub mod company;
