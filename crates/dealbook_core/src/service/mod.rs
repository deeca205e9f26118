//! Use-case services over the company, collection and membership stores.
//!
//! # Responsibility
//! - Orchestrate store calls into caller-level operations.
//! - Map store failures onto the caller-facing error taxonomy.
//!
//! # Invariants
//! - Services are stateless across calls apart from the resolved liked
//!   collection handle and paging limits.
//! - Reads are read-committed: a `liked` flag reflects the index at the
//!   moment of the read and may be stale under concurrent mutation.

pub mod collection_query;
pub mod company_query;
pub mod error;
pub mod liked;
pub mod membership;
pub mod paging;
