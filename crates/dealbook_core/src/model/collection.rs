//! Collection records, memberships and page projections.
//!
//! # Invariants
//! - A `(company_id, collection_id)` pair exists at most once.
//! - The reserved liked collection is addressed by name through
//!   [`LIKED_COLLECTION_NAME`] and resolved to an id once per process.

use crate::model::company::{CompanyId, CompanyView};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a collection.
pub type CollectionId = Uuid;

/// Name of the reserved collection targeted by like/unlike actions.
pub const LIKED_COLLECTION_NAME: &str = "Liked Companies List";

/// Collection metadata `{id, collection_name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    #[serde(rename = "collection_name")]
    pub name: String,
}

impl Collection {
    /// Creates a collection with a generated stable id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Association between one company and one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Membership {
    pub company_id: CompanyId,
    pub collection_id: CollectionId,
}

impl Membership {
    pub fn new(company_id: CompanyId, collection_id: CollectionId) -> Self {
        Self {
            company_id,
            collection_id,
        }
    }
}

/// How a caller addressed a collection.
///
/// Add resolves collections by name while remove addresses them by id; the
/// reference is kept so errors can echo what the caller sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionRef {
    Id(CollectionId),
    Name(String),
}

impl Display for CollectionRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Name(name) => write!(f, "name=`{name}`"),
        }
    }
}

/// One page of a collection's membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPage {
    pub id: CollectionId,
    #[serde(rename = "collection_name")]
    pub name: String,
    /// Enriched members for the slice `[offset, offset + limit)`.
    pub companies: Vec<CompanyView>,
    /// Full membership count, independent of paging.
    pub total: u64,
}
