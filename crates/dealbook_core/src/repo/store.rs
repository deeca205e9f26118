//! Shared store plumbing: error type, paging window and the SQLite handle.

use crate::db::DbError;
use crate::model::collection::{CollectionId, Membership};
use crate::model::company::{Company, CompanyId};
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Keeps `IN (...)` lists well below SQLite's bound-variable limit.
pub(crate) const ID_LOOKUP_CHUNK: usize = 500;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for company, collection and membership operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    CollectionNotFound(CollectionId),
    CompanyNotFound(CompanyId),
    MembershipNotFound(Membership),
    DuplicateMembership(Membership),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::CollectionNotFound(id) => write!(f, "collection not found: {id}"),
            Self::CompanyNotFound(id) => write!(f, "company not found: {id}"),
            Self::MembershipNotFound(membership) => write!(
                f,
                "company {} is not in collection {}",
                membership.company_id, membership.collection_id
            ),
            Self::DuplicateMembership(membership) => write!(
                f,
                "company {} already in collection {}",
                membership.company_id, membership.collection_id
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Normalized paging window. Callers clamp `limit` before building one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }
}

/// SQLite-backed store over the three company/collection relations.
///
/// Holds a shared connection borrow; writes open their own immediate
/// transaction so the handle can be shared by several services.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the connection was not migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in [
            "companies",
            "company_collections",
            "company_collection_associations",
        ] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

pub(crate) fn parse_collection_id(value: &str) -> RepoResult<CollectionId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{value}` in company_collections.id"
        ))
    })
}

pub(crate) fn parse_company_row(row: &Row<'_>) -> RepoResult<Company> {
    Ok(Company {
        id: row.get("id")?,
        name: row.get("company_name")?,
    })
}

pub(crate) fn count_to_u64(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{value}`")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
