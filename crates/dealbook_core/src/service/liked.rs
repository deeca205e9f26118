//! Liked-status enrichment.
//!
//! # Responsibility
//! - Resolve the reserved liked collection once into a stable handle.
//! - Decorate company batches with `liked`, computed by set intersection
//!   against the liked collection's memberships.
//!
//! # Invariants
//! - Enrichment is a pure read; it never mutates memberships.
//! - Each existing company appears exactly once in the output; unknown ids
//!   are dropped silently.
//! - A liked handle whose collection disappeared fails with
//!   `MissingDefaultCollection` instead of reporting everything unliked.

use crate::model::collection::CollectionId;
use crate::model::company::{Company, CompanyId, CompanyView};
use crate::repo::collection_store::CollectionStore;
use crate::repo::company_store::CompanyStore;
use crate::repo::membership_index::MembershipIndex;
use crate::service::error::{ServiceError, ServiceResult};
use log::error;

/// Resolved handle to the reserved liked collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedCollection {
    id: CollectionId,
    name: String,
}

impl LikedCollection {
    /// Resolves the liked collection by name.
    ///
    /// Intended to run once at startup; failure is a configuration defect.
    ///
    /// # Errors
    /// - `MissingDefaultCollection` when no collection carries `name`.
    pub fn resolve<S: CollectionStore>(store: &S, name: &str) -> ServiceResult<Self> {
        match store.find_collection_by_name(name)? {
            Some(collection) => Ok(Self {
                id: collection.id,
                name: collection.name,
            }),
            None => {
                error!(
                    "event=liked_resolve module=service status=error error_code=missing_default_collection name={name}"
                );
                Err(ServiceError::MissingDefaultCollection(name.to_string()))
            }
        }
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fails with `MissingDefaultCollection` once the row behind this
    /// handle has been deleted.
    pub(crate) fn ensure_present<S: CollectionStore>(&self, store: &S) -> ServiceResult<()> {
        if store.get_collection(self.id)?.is_none() {
            error!(
                "event=liked_check module=service status=error error_code=missing_default_collection collection_id={}",
                self.id
            );
            return Err(ServiceError::MissingDefaultCollection(self.name.clone()));
        }
        Ok(())
    }
}

/// Computes `liked` for batches of companies.
#[derive(Debug, Clone)]
pub struct LikedStatusEnricher {
    liked: LikedCollection,
}

impl LikedStatusEnricher {
    pub fn new(liked: LikedCollection) -> Self {
        Self { liked }
    }

    /// Loads and decorates the companies for `ids`, ascending by id.
    pub fn enrich<S>(&self, store: &S, ids: &[CompanyId]) -> ServiceResult<Vec<CompanyView>>
    where
        S: CompanyStore + CollectionStore + MembershipIndex,
    {
        let companies = store.get_companies(ids)?;
        self.decorate(store, companies)
    }

    /// Decorates already-loaded records, preserving their order.
    pub fn decorate<S>(&self, store: &S, companies: Vec<Company>) -> ServiceResult<Vec<CompanyView>>
    where
        S: CollectionStore + MembershipIndex,
    {
        self.liked.ensure_present(store)?;
        if companies.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<CompanyId> = companies.iter().map(|company| company.id).collect();
        let liked_ids = store.members_among(self.liked.id, &ids)?;
        Ok(companies
            .into_iter()
            .map(|company| {
                let liked = liked_ids.contains(&company.id);
                company.with_liked(liked)
            })
            .collect())
    }
}
