//! Use-case API mirroring the external collection/company endpoints.
//!
//! # Responsibility
//! - Expose request-shaped functions (path/query values in, JSON-ready
//!   bodies out) over an opened connection.
//! - Translate core failures into `{status, detail}` envelopes.
//!
//! # Invariants
//! - Functions never panic; every failure is an `ApiError`.
//! - Response bodies serialize to the original wire field names
//!   (`company_name`, `collection_name`, `liked`, `total`, `message`).

use dealbook_core::db::{open_db, open_db_in_memory};
use dealbook_core::progress::{run_session, SessionOptions, SessionOutcome, SessionTransport};
use dealbook_core::{
    page_args, BatchOutcome, Collection, CollectionId, CollectionPage, CollectionQueryService,
    CompanyBatch, CompanyId, CompanyQueryService, CoreConfig, LikedCollection,
    LikedStatusEnricher, MembershipService, MutationAck, RepoError, ServiceError, SqliteStore,
};
use log::error;
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const STATUS_UNPROCESSABLE: u16 = 422;
const STATUS_INTERNAL: u16 = 500;

/// `{status, detail}` failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub detail: String,
}

impl ApiError {
    fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.detail)
    }
}

impl Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        if value.status_code() >= STATUS_INTERNAL {
            error!("event=api_call module=api status=error error={value}");
        }
        Self::new(value.status_code(), value.to_string())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Process-wide settings plus the liked collection resolved at startup.
#[derive(Debug, Clone)]
pub struct ApiContext {
    config: CoreConfig,
    liked: LikedCollection,
}

impl ApiContext {
    /// Resolves the liked collection once; a missing one fails fast.
    pub fn bootstrap(conn: &Connection, config: CoreConfig) -> ApiResult<Self> {
        let store = SqliteStore::try_new(conn)?;
        let liked = LikedCollection::resolve(&store, &config.liked_collection_name)?;
        Ok(Self { config, liked })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn liked(&self) -> &LikedCollection {
        &self.liked
    }

    fn enricher(&self) -> LikedStatusEnricher {
        LikedStatusEnricher::new(self.liked.clone())
    }
}

/// Opens the configured database (in memory when `db_path` is unset).
pub fn open_connection(config: &CoreConfig) -> ApiResult<Connection> {
    let opened = match &config.db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    opened.map_err(|err| ApiError::new(STATUS_INTERNAL, format!("database open failed: {err}")))
}

/// `GET /collections`
pub fn get_collections_metadata(conn: &Connection, ctx: &ApiContext) -> ApiResult<Vec<Collection>> {
    Ok(collection_queries(conn, ctx)?.list_collections()?)
}

/// `GET /collections/{collection_id}?offset&limit`
pub fn get_collection_page(
    conn: &Connection,
    ctx: &ApiContext,
    collection_id: &str,
    offset: Option<i64>,
    limit: Option<i64>,
) -> ApiResult<CollectionPage> {
    let collection_id = parse_collection_id(collection_id)?;
    let (offset, limit) = page_args(offset.unwrap_or(0), limit)?;
    Ok(collection_queries(conn, ctx)?.get_collection_page(collection_id, offset, limit)?)
}

/// `GET /collections/{collection_id}/companies/all`
pub fn get_all_companies_in_collection(
    conn: &Connection,
    ctx: &ApiContext,
    collection_id: &str,
) -> ApiResult<CompanyBatch> {
    let collection_id = parse_collection_id(collection_id)?;
    Ok(collection_queries(conn, ctx)?.list_all_companies(collection_id)?)
}

/// `GET /companies?offset&limit`
pub fn get_companies(
    conn: &Connection,
    ctx: &ApiContext,
    offset: Option<i64>,
    limit: Option<i64>,
) -> ApiResult<CompanyBatch> {
    let (offset, limit) = page_args(offset.unwrap_or(0), limit)?;
    let store = SqliteStore::try_new(conn)?;
    let service = CompanyQueryService::new(store, ctx.enricher(), ctx.config.page_limits());
    Ok(service.list_companies(offset, limit)?)
}

/// `POST /companies/{company_id}/add-to-collection?collection_name`
pub fn add_company_to_collection(
    conn: &Connection,
    ctx: &ApiContext,
    company_id: CompanyId,
    collection_name: Option<&str>,
) -> ApiResult<MutationAck> {
    Ok(memberships(conn, ctx)?.add_to_collection(company_id, collection_name)?)
}

/// `DELETE /companies/{company_id}/remove-from-collection/{collection_id}`
pub fn remove_company_from_collection(
    conn: &Connection,
    ctx: &ApiContext,
    company_id: CompanyId,
    collection_id: &str,
) -> ApiResult<MutationAck> {
    let collection_id = parse_collection_id(collection_id)?;
    Ok(memberships(conn, ctx)?.remove_from_collection(company_id, collection_id)?)
}

/// Adds many companies, forwarding per-item progress as wire messages.
pub fn add_companies_to_collection(
    conn: &Connection,
    ctx: &ApiContext,
    company_ids: &[CompanyId],
    collection_name: Option<&str>,
    mut on_progress: impl FnMut(serde_json::Value),
) -> ApiResult<BatchOutcome> {
    Ok(memberships(conn, ctx)?.add_companies(company_ids, collection_name, |message| {
        on_progress(message.to_value())
    })?)
}

/// `WS /ws/progress`: runs one relay session on the calling thread.
pub fn progress_session<T: SessionTransport>(transport: T, ctx: &ApiContext) -> SessionOutcome {
    let options = SessionOptions {
        idle_timeout: ctx.config.progress_idle_timeout(),
    };
    run_session(transport, options)
}

fn parse_collection_id(raw: &str) -> ApiResult<CollectionId> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::new(
            STATUS_UNPROCESSABLE,
            format!("collection_id `{raw}` is not a valid uuid"),
        )
    })
}

fn collection_queries<'conn>(
    conn: &'conn Connection,
    ctx: &ApiContext,
) -> ApiResult<CollectionQueryService<SqliteStore<'conn>>> {
    let store = SqliteStore::try_new(conn)?;
    Ok(CollectionQueryService::new(
        store,
        ctx.enricher(),
        ctx.config.page_limits(),
    ))
}

fn memberships<'conn>(
    conn: &'conn Connection,
    ctx: &ApiContext,
) -> ApiResult<MembershipService<SqliteStore<'conn>>> {
    let store = SqliteStore::try_new(conn)?;
    Ok(MembershipService::new(store, ctx.liked.clone()))
}
