//! Collection store contract and SQLite implementation.

use crate::model::collection::{Collection, CollectionId};
use crate::repo::store::{parse_collection_id, RepoResult, SqliteStore};
use rusqlite::{params, OptionalExtension, Row};

const COLLECTION_SELECT_SQL: &str = "SELECT id, collection_name FROM company_collections";

/// Repository interface for named collections.
pub trait CollectionStore {
    /// Lists every collection ordered by name, then id.
    fn list_collections(&self) -> RepoResult<Vec<Collection>>;
    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<Collection>>;
    /// Exact, case-sensitive name lookup.
    fn find_collection_by_name(&self, name: &str) -> RepoResult<Option<Collection>>;
    fn insert_collection(&self, collection: &Collection) -> RepoResult<CollectionId>;
}

impl CollectionStore for SqliteStore<'_> {
    fn list_collections(&self) -> RepoResult<Vec<Collection>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLLECTION_SELECT_SQL} ORDER BY collection_name ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut collections = Vec::new();
        while let Some(row) = rows.next()? {
            collections.push(parse_collection_row(row)?);
        }
        Ok(collections)
    }

    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<Collection>> {
        let row = self
            .conn
            .query_row(
                &format!("{COLLECTION_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(into_collection).transpose()
    }

    fn find_collection_by_name(&self, name: &str) -> RepoResult<Option<Collection>> {
        let row = self
            .conn
            .query_row(
                &format!("{COLLECTION_SELECT_SQL} WHERE collection_name = ?1;"),
                [name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(into_collection).transpose()
    }

    fn insert_collection(&self, collection: &Collection) -> RepoResult<CollectionId> {
        self.conn.execute(
            "INSERT INTO company_collections (id, collection_name) VALUES (?1, ?2);",
            params![collection.id.to_string(), collection.name.as_str()],
        )?;
        Ok(collection.id)
    }
}

fn parse_collection_row(row: &Row<'_>) -> RepoResult<Collection> {
    into_collection((row.get("id")?, row.get("collection_name")?))
}

fn into_collection((id, name): (String, String)) -> RepoResult<Collection> {
    Ok(Collection {
        id: parse_collection_id(&id)?,
        name,
    })
}
