//! Membership index: the company/collection association relation.
//!
//! # Invariants
//! - A `(company_id, collection_id)` pair is stored at most once.
//! - Add and remove validate existence and mutate inside one immediate
//!   transaction; either the row change commits or nothing is observable.
//! - Member listings follow insertion order (`associations.id ASC`), ties
//!   broken by `company_id ASC`.

use crate::model::collection::{CollectionId, Membership};
use crate::model::company::{Company, CompanyId};
use crate::repo::store::{
    count_to_u64, parse_company_row, Page, RepoError, RepoResult, SqliteStore,
    ID_LOOKUP_CHUNK,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

const MEMBER_SELECT_SQL: &str = "SELECT c.id, c.company_name
FROM company_collection_associations a
INNER JOIN companies c ON c.id = a.company_id
WHERE a.collection_id = ?1
ORDER BY a.id ASC, a.company_id ASC";

/// Repository interface for collection memberships.
pub trait MembershipIndex {
    /// Inserts one membership.
    ///
    /// # Errors
    /// - `CollectionNotFound` / `CompanyNotFound` when either side is absent.
    /// - `DuplicateMembership` when the pair already exists.
    fn add_membership(&self, membership: Membership) -> RepoResult<()>;
    /// Deletes one membership.
    ///
    /// # Errors
    /// - `CollectionNotFound` when the collection is absent.
    /// - `MembershipNotFound` when the pair does not exist.
    fn remove_membership(&self, membership: Membership) -> RepoResult<()>;
    fn contains(&self, membership: Membership) -> RepoResult<bool>;
    fn count_members(&self, collection_id: CollectionId) -> RepoResult<u64>;
    fn member_page(&self, collection_id: CollectionId, page: Page) -> RepoResult<Vec<Company>>;
    fn all_members(&self, collection_id: CollectionId) -> RepoResult<Vec<Company>>;
    /// Returns the subset of `company_ids` that belong to `collection_id`.
    fn members_among(
        &self,
        collection_id: CollectionId,
        company_ids: &[CompanyId],
    ) -> RepoResult<BTreeSet<CompanyId>>;
}

impl MembershipIndex for SqliteStore<'_> {
    fn add_membership(&self, membership: Membership) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !collection_exists(&tx, membership.collection_id)? {
            return Err(RepoError::CollectionNotFound(membership.collection_id));
        }
        if !company_exists(&tx, membership.company_id)? {
            return Err(RepoError::CompanyNotFound(membership.company_id));
        }
        if membership_exists(&tx, membership)? {
            return Err(RepoError::DuplicateMembership(membership));
        }

        tx.execute(
            "INSERT INTO company_collection_associations (company_id, collection_id)
             VALUES (?1, ?2);",
            params![membership.company_id, membership.collection_id.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove_membership(&self, membership: Membership) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !collection_exists(&tx, membership.collection_id)? {
            return Err(RepoError::CollectionNotFound(membership.collection_id));
        }

        let changed = tx.execute(
            "DELETE FROM company_collection_associations
             WHERE company_id = ?1 AND collection_id = ?2;",
            params![membership.company_id, membership.collection_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::MembershipNotFound(membership));
        }

        tx.commit()?;
        Ok(())
    }

    fn contains(&self, membership: Membership) -> RepoResult<bool> {
        membership_exists(self.conn, membership)
    }

    fn count_members(&self, collection_id: CollectionId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM company_collection_associations a
             INNER JOIN companies c ON c.id = a.company_id
             WHERE a.collection_id = ?1;",
            [collection_id.to_string()],
            |row| row.get(0),
        )?;
        count_to_u64(count)
    }

    fn member_page(&self, collection_id: CollectionId, page: Page) -> RepoResult<Vec<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} LIMIT ?2 OFFSET ?3;"))?;
        let mut rows = stmt.query(params![
            collection_id.to_string(),
            i64::from(page.limit),
            i64::from(page.offset),
        ])?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }

    fn all_members(&self, collection_id: CollectionId) -> RepoResult<Vec<Company>> {
        let mut stmt = self.conn.prepare(&format!("{MEMBER_SELECT_SQL};"))?;
        let mut rows = stmt.query([collection_id.to_string()])?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }

    fn members_among(
        &self,
        collection_id: CollectionId,
        company_ids: &[CompanyId],
    ) -> RepoResult<BTreeSet<CompanyId>> {
        let unique: BTreeSet<CompanyId> = company_ids.iter().copied().collect();
        let mut members = BTreeSet::new();
        if unique.is_empty() {
            return Ok(members);
        }

        let unique: Vec<CompanyId> = unique.into_iter().collect();
        for chunk in unique.chunks(ID_LOOKUP_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT company_id
                 FROM company_collection_associations
                 WHERE collection_id = ?
                   AND company_id IN ({placeholders});"
            );
            let mut bind_values = Vec::with_capacity(chunk.len() + 1);
            bind_values.push(Value::Text(collection_id.to_string()));
            bind_values.extend(chunk.iter().map(|id| Value::Integer(*id)));

            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            while let Some(row) = rows.next()? {
                members.insert(row.get::<_, CompanyId>(0)?);
            }
        }

        Ok(members)
    }
}

fn collection_exists(conn: &Connection, collection_id: CollectionId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM company_collections WHERE id = ?1);",
        [collection_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn company_exists(conn: &Connection, company_id: CompanyId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM companies WHERE id = ?1);",
        [company_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn membership_exists(conn: &Connection, membership: Membership) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM company_collection_associations
            WHERE company_id = ?1 AND collection_id = ?2
        );",
        params![membership.company_id, membership.collection_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
