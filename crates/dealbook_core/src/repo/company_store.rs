//! Company store contract and SQLite implementation.
//!
//! Read-only from the core's point of view; `insert_company` exists for
//! seeding and tests.

use crate::model::company::{Company, CompanyId};
use crate::repo::store::{
    count_to_u64, parse_company_row, Page, RepoResult, SqliteStore, ID_LOOKUP_CHUNK,
};
use rusqlite::{params, params_from_iter};
use std::collections::BTreeSet;

/// Repository interface for company records.
pub trait CompanyStore {
    /// Loads the companies for `ids`, ascending by id.
    ///
    /// Duplicate ids collapse to one record; unknown ids are dropped.
    fn get_companies(&self, ids: &[CompanyId]) -> RepoResult<Vec<Company>>;
    /// Lists one page of all companies ordered by id.
    fn list_companies(&self, page: Page) -> RepoResult<Vec<Company>>;
    fn count_companies(&self) -> RepoResult<u64>;
    fn company_exists(&self, id: CompanyId) -> RepoResult<bool>;
    fn insert_company(&self, company: &Company) -> RepoResult<CompanyId>;
}

impl CompanyStore for SqliteStore<'_> {
    fn get_companies(&self, ids: &[CompanyId]) -> RepoResult<Vec<Company>> {
        let unique: BTreeSet<CompanyId> = ids.iter().copied().collect();
        let unique: Vec<CompanyId> = unique.into_iter().collect();
        let mut companies = Vec::with_capacity(unique.len());

        for chunk in unique.chunks(ID_LOOKUP_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT id, company_name
                 FROM companies
                 WHERE id IN ({placeholders})
                 ORDER BY id ASC;"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                companies.push(parse_company_row(row)?);
            }
        }

        Ok(companies)
    }

    fn list_companies(&self, page: Page) -> RepoResult<Vec<Company>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company_name
             FROM companies
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2;",
        )?;
        let mut rows = stmt.query(params![i64::from(page.limit), i64::from(page.offset)])?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }

    fn count_companies(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM companies;", [], |row| row.get(0))?;
        count_to_u64(count)
    }

    fn company_exists(&self, id: CompanyId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM companies WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_company(&self, company: &Company) -> RepoResult<CompanyId> {
        self.conn.execute(
            "INSERT INTO companies (id, company_name) VALUES (?1, ?2);",
            params![company.id, company.name.as_str()],
        )?;
        Ok(company.id)
    }
}
