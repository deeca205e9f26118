//! Core domain logic for dealbook company collections.
//! This crate is the single source of truth for membership invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod progress;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, PageLimits};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::collection::{
    Collection, CollectionId, CollectionPage, CollectionRef, Membership, LIKED_COLLECTION_NAME,
};
pub use model::company::{Company, CompanyBatch, CompanyId, CompanyView};
pub use repo::collection_store::CollectionStore;
pub use repo::company_store::CompanyStore;
pub use repo::membership_index::MembershipIndex;
pub use repo::{Page, RepoError, RepoResult, SqliteStore};
pub use service::collection_query::CollectionQueryService;
pub use service::company_query::CompanyQueryService;
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::liked::{LikedCollection, LikedStatusEnricher};
pub use service::membership::{BatchOutcome, MembershipService, MutationAck};
pub use service::paging::page_args;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
