//! Global company listing.

use crate::config::PageLimits;
use crate::model::company::CompanyBatch;
use crate::repo::collection_store::CollectionStore;
use crate::repo::company_store::CompanyStore;
use crate::repo::membership_index::MembershipIndex;
use crate::service::error::ServiceResult;
use crate::service::liked::LikedStatusEnricher;
use crate::service::paging::window;

/// Read-side service for the company catalogue, paged by company id.
pub struct CompanyQueryService<S> {
    store: S,
    enricher: LikedStatusEnricher,
    limits: PageLimits,
}

impl<S> CompanyQueryService<S>
where
    S: CompanyStore + CollectionStore + MembershipIndex,
{
    pub fn new(store: S, enricher: LikedStatusEnricher, limits: PageLimits) -> Self {
        Self {
            store,
            enricher,
            limits,
        }
    }

    pub fn list_companies(&self, offset: u32, limit: Option<u32>) -> ServiceResult<CompanyBatch> {
        let page = window(&self.limits, offset, limit);
        let total = self.store.count_companies()?;
        let records = self.store.list_companies(page)?;
        let companies = self.enricher.decorate(&self.store, records)?;
        Ok(CompanyBatch { companies, total })
    }
}
