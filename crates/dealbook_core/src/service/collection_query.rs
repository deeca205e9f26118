//! Collection read use-cases.
//!
//! # Invariants
//! - Page slices follow membership insertion order, ties by company id.
//! - `total` counts the whole membership regardless of the page window.
//! - An unknown collection id fails with `CollectionNotFound` before any
//!   membership query runs.

use crate::config::PageLimits;
use crate::model::collection::{Collection, CollectionId, CollectionPage, CollectionRef};
use crate::model::company::CompanyBatch;
use crate::repo::collection_store::CollectionStore;
use crate::repo::membership_index::MembershipIndex;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::liked::LikedStatusEnricher;
use crate::service::paging::window;
use log::debug;

/// Read-side service for collection metadata and membership pages.
pub struct CollectionQueryService<S> {
    store: S,
    enricher: LikedStatusEnricher,
    limits: PageLimits,
}

impl<S> CollectionQueryService<S>
where
    S: CollectionStore + MembershipIndex,
{
    pub fn new(store: S, enricher: LikedStatusEnricher, limits: PageLimits) -> Self {
        Self {
            store,
            enricher,
            limits,
        }
    }

    /// Lists `{id, collection_name}` for every collection.
    pub fn list_collections(&self) -> ServiceResult<Vec<Collection>> {
        Ok(self.store.list_collections()?)
    }

    /// Returns one enriched page of a collection's members.
    ///
    /// # Contract
    /// - `limit` defaults and clamps through the configured `PageLimits`.
    /// - `offset >= total` yields an empty `companies` list with the real total.
    pub fn get_collection_page(
        &self,
        collection_id: CollectionId,
        offset: u32,
        limit: Option<u32>,
    ) -> ServiceResult<CollectionPage> {
        let collection = self.require_collection(collection_id)?;
        let page = window(&self.limits, offset, limit);

        let total = self.store.count_members(collection_id)?;
        let members = self.store.member_page(collection_id, page)?;
        let companies = self.enricher.decorate(&self.store, members)?;

        debug!(
            "event=collection_page module=service status=ok collection_id={collection_id} offset={} limit={} returned={} total={total}",
            page.offset,
            page.limit,
            companies.len()
        );
        Ok(CollectionPage {
            id: collection.id,
            name: collection.name,
            companies,
            total,
        })
    }

    /// Returns every member of a collection without liked decoration.
    ///
    /// Every returned company reports `liked = false`, whatever the liked
    /// collection holds; use `get_collection_page` for decorated views.
    ///
    /// # Errors
    /// - `CollectionNotFound` when the id does not resolve.
    /// - `CollectionEmpty` when the collection has no members.
    pub fn list_all_companies(&self, collection_id: CollectionId) -> ServiceResult<CompanyBatch> {
        self.require_collection(collection_id)?;
        let members = self.store.all_members(collection_id)?;
        if members.is_empty() {
            return Err(ServiceError::CollectionEmpty(collection_id));
        }

        let companies: Vec<_> = members
            .into_iter()
            .map(|company| company.with_liked(false))
            .collect();
        let total = companies.len() as u64;
        Ok(CompanyBatch { companies, total })
    }

    fn require_collection(&self, collection_id: CollectionId) -> ServiceResult<Collection> {
        self.store
            .get_collection(collection_id)?
            .ok_or(ServiceError::CollectionNotFound(CollectionRef::Id(
                collection_id,
            )))
    }
}
