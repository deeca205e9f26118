//! Membership mutation use-cases.
//!
//! # Responsibility
//! - Add companies to collections addressed by name (default: liked).
//! - Remove companies from collections addressed by id.
//! - Apply batches item by item with progress reporting.
//!
//! # Invariants
//! - Each single mutation is atomic; batches are not.
//! - Duplicate adds fail with `DuplicateMembership` and leave the index
//!   unchanged; removes of absent pairs fail with `MembershipNotFound`.

use crate::model::collection::{CollectionId, CollectionRef, Membership};
use crate::model::company::CompanyId;
use crate::progress::message::ProgressMessage;
use crate::repo::collection_store::CollectionStore;
use crate::repo::membership_index::MembershipIndex;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::liked::LikedCollection;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const ADDED_MESSAGE: &str = "Company added to collection";
pub const REMOVED_MESSAGE: &str = "Company removed from collection";

/// `{"message": ...}` acknowledgment for a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationAck {
    pub message: String,
}

impl MutationAck {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Per-item results of a batch mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub applied: Vec<CompanyId>,
    /// Already in the desired state (duplicate add / absent remove).
    pub unchanged: Vec<CompanyId>,
    pub failed: Vec<(CompanyId, String)>,
}

/// Write-side service for collection memberships.
pub struct MembershipService<S> {
    store: S,
    liked: LikedCollection,
}

impl<S> MembershipService<S>
where
    S: CollectionStore + MembershipIndex,
{
    pub fn new(store: S, liked: LikedCollection) -> Self {
        Self { store, liked }
    }

    /// Adds a company to the collection named `collection_name`.
    ///
    /// `None` targets the liked collection through its resolved handle.
    ///
    /// # Errors
    /// - `MissingDefaultCollection` when `None` is given and the liked
    ///   collection has been deleted since startup.
    pub fn add_to_collection(
        &self,
        company_id: CompanyId,
        collection_name: Option<&str>,
    ) -> ServiceResult<MutationAck> {
        let collection_id = self.resolve_target(collection_name)?;
        self.add_by_id(company_id, collection_id)?;
        Ok(MutationAck::new(ADDED_MESSAGE))
    }

    /// Removes a company from the collection with `collection_id`.
    pub fn remove_from_collection(
        &self,
        company_id: CompanyId,
        collection_id: CollectionId,
    ) -> ServiceResult<MutationAck> {
        let membership = Membership::new(company_id, collection_id);
        match self.store.remove_membership(membership) {
            Ok(()) => {
                info!(
                    "event=membership_remove module=service status=ok company_id={company_id} collection_id={collection_id}"
                );
                Ok(MutationAck::new(REMOVED_MESSAGE))
            }
            Err(err) => Err(rejected("membership_remove", membership, err.into())),
        }
    }

    pub fn like(&self, company_id: CompanyId) -> ServiceResult<MutationAck> {
        self.add_to_collection(company_id, None)
    }

    pub fn unlike(&self, company_id: CompanyId) -> ServiceResult<MutationAck> {
        self.liked.ensure_present(&self.store)?;
        self.remove_from_collection(company_id, self.liked.id())
    }

    /// Adds each company in order, reporting progress after every item and
    /// a completion message at the end.
    ///
    /// # Errors
    /// - `CollectionNotFound` when the target does not resolve; nothing is
    ///   applied in that case.
    pub fn add_companies(
        &self,
        company_ids: &[CompanyId],
        collection_name: Option<&str>,
        mut on_progress: impl FnMut(&ProgressMessage),
    ) -> ServiceResult<BatchOutcome> {
        let collection_id = self.resolve_target(collection_name)?;
        Ok(self.run_batch(company_ids, &mut on_progress, |company_id| {
            self.add_by_id(company_id, collection_id)
        }))
    }

    /// Removes each company in order with the same reporting as
    /// `add_companies`.
    pub fn remove_companies(
        &self,
        company_ids: &[CompanyId],
        collection_id: CollectionId,
        mut on_progress: impl FnMut(&ProgressMessage),
    ) -> ServiceResult<BatchOutcome> {
        if self.store.get_collection(collection_id)?.is_none() {
            return Err(ServiceError::CollectionNotFound(CollectionRef::Id(
                collection_id,
            )));
        }
        Ok(self.run_batch(company_ids, &mut on_progress, |company_id| {
            self.remove_from_collection(company_id, collection_id)
                .map(|_| ())
        }))
    }

    fn resolve_target(&self, collection_name: Option<&str>) -> ServiceResult<CollectionId> {
        let Some(name) = collection_name else {
            self.liked.ensure_present(&self.store)?;
            return Ok(self.liked.id());
        };
        match self.store.find_collection_by_name(name)? {
            Some(collection) => Ok(collection.id),
            None => {
                warn!(
                    "event=membership_add module=service status=rejected error_code=collection_not_found collection_name={name}"
                );
                Err(ServiceError::CollectionNotFound(CollectionRef::Name(
                    name.to_string(),
                )))
            }
        }
    }

    fn add_by_id(&self, company_id: CompanyId, collection_id: CollectionId) -> ServiceResult<()> {
        let membership = Membership::new(company_id, collection_id);
        match self.store.add_membership(membership) {
            Ok(()) => {
                info!(
                    "event=membership_add module=service status=ok company_id={company_id} collection_id={collection_id}"
                );
                Ok(())
            }
            Err(err) => Err(rejected("membership_add", membership, err.into())),
        }
    }

    fn run_batch(
        &self,
        company_ids: &[CompanyId],
        on_progress: &mut impl FnMut(&ProgressMessage),
        mut apply: impl FnMut(CompanyId) -> ServiceResult<()>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let total = company_ids.len();

        for (index, company_id) in company_ids.iter().copied().enumerate() {
            match apply(company_id) {
                Ok(()) => outcome.applied.push(company_id),
                Err(ServiceError::DuplicateMembership(_) | ServiceError::MembershipNotFound(_)) => {
                    outcome.unchanged.push(company_id)
                }
                Err(err) => outcome.failed.push((company_id, err.to_string())),
            }
            let percentage = ((index + 1) * 100 / total) as u64;
            on_progress(&ProgressMessage::progress(percentage));
        }

        on_progress(&ProgressMessage::completed());
        info!(
            "event=membership_batch module=service status=ok total={total} applied={} unchanged={} failed={}",
            outcome.applied.len(),
            outcome.unchanged.len(),
            outcome.failed.len()
        );
        outcome
    }
}

fn rejected(event: &'static str, membership: Membership, err: ServiceError) -> ServiceError {
    warn!(
        "event={event} module=service status=rejected company_id={} collection_id={} error={err}",
        membership.company_id, membership.collection_id
    );
    err
}
