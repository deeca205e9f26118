//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `dealbook_core` / `dealbook_api` wiring end to end.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Honors `DEALBOOK_DB_PATH` and `DEALBOOK_LOG_LEVEL`; an optional first
//! argument names a JSON config file.

use dealbook_api::{
    add_companies_to_collection, add_company_to_collection, get_collection_page,
    get_collections_metadata, open_connection, progress_session, remove_company_from_collection,
    ApiContext,
};
use dealbook_core::progress::{memory_pair, ServerFrame};
use dealbook_core::{
    core_version, init_logging_from_config, Collection, CollectionStore, Company, CompanyStore,
    CoreConfig, SqliteStore,
};
use rusqlite::Connection;
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

const SMOKE_COLLECTION: &str = "Smoke Test List";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dealbook smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::from_json_file(path)?,
        None => CoreConfig::default(),
    }
    .with_env_overrides()?;
    init_logging_from_config(&config)?;
    println!("dealbook_core version={}", core_version());

    let conn = open_connection(&config)?;
    seed(&conn)?;
    let ctx = ApiContext::bootstrap(&conn, config)?;

    let collections = get_collections_metadata(&conn, &ctx)?;
    println!("collections={}", serde_json::to_string(&collections)?);

    let ids: Vec<i64> = (1..=3).collect();
    let outcome = add_companies_to_collection(&conn, &ctx, &ids, None, |event| {
        println!("batch_progress={event}")
    })?;
    println!("batch_applied={:?}", outcome.applied);

    let smoke_id = collections
        .iter()
        .find(|collection| collection.name == SMOKE_COLLECTION)
        .map(|collection| collection.id.to_string())
        .ok_or("smoke collection missing after seed")?;
    let added = add_company_to_collection(&conn, &ctx, 1, Some(SMOKE_COLLECTION))?;
    println!("smoke_add={}", added.message);
    let removed = remove_company_from_collection(&conn, &ctx, 1, &smoke_id)?;
    println!("smoke_remove={}", removed.message);

    let liked_id = ctx.liked().id().to_string();
    let page = get_collection_page(&conn, &ctx, &liked_id, Some(0), Some(2))?;
    println!("liked_page={}", serde_json::to_string(&page)?);

    let (transport, peer) = memory_pair();
    let relay_ctx = ctx.clone();
    let session = thread::spawn(move || progress_session(transport, &relay_ctx));
    peer.send_json(&json!({"progress_percentage": 100}))?;
    peer.send_json(&json!({"message": "Task completed"}))?;
    while let Some(ServerFrame::Message(frame)) = peer.recv(Duration::from_secs(1)) {
        println!("progress_echo={frame}");
    }
    let outcome = session
        .join()
        .map_err(|_| "progress session thread panicked")?;
    println!("progress_outcome={outcome:?}");
    Ok(())
}

fn seed(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let store = SqliteStore::try_new(conn)?;
    if store.find_collection_by_name(SMOKE_COLLECTION)?.is_none() {
        store.insert_collection(&Collection::new(SMOKE_COLLECTION))?;
    }
    for id in 1..=3 {
        if !store.company_exists(id)? {
            store.insert_company(&Company::new(id, format!("Smoke Company {id}")))?;
        }
    }
    Ok(())
}
