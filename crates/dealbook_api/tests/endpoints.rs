use dealbook_api::{
    add_companies_to_collection, add_company_to_collection, get_all_companies_in_collection,
    get_collection_page, get_collections_metadata, get_companies, open_connection,
    progress_session, remove_company_from_collection, ApiContext,
};
use dealbook_core::progress::{memory_pair, ServerFrame, SessionOutcome};
use dealbook_core::{Collection, CollectionStore, Company, CompanyStore, CoreConfig, SqliteStore};
use rusqlite::Connection;
use serde_json::json;
use std::time::Duration;

fn setup(companies: i64) -> (Connection, ApiContext, String) {
    let config = CoreConfig::default();
    let conn = open_connection(&config).unwrap();
    let collection = Collection::new("My List");
    {
        let store = SqliteStore::try_new(&conn).unwrap();
        for id in 1..=companies {
            store
                .insert_company(&Company::new(id, format!("Company {id}")))
                .unwrap();
        }
        store.insert_collection(&collection).unwrap();
    }
    let ctx = ApiContext::bootstrap(&conn, config).unwrap();
    (conn, ctx, collection.id.to_string())
}

#[test]
fn collection_page_serializes_to_wire_shape() {
    let (conn, ctx, collection_id) = setup(2);
    add_company_to_collection(&conn, &ctx, 1, Some("My List")).unwrap();
    add_company_to_collection(&conn, &ctx, 1, None).unwrap();

    let page = get_collection_page(&conn, &ctx, &collection_id, None, None).unwrap();
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!({
            "id": collection_id,
            "collection_name": "My List",
            "companies": [{"id": 1, "company_name": "Company 1", "liked": true}],
            "total": 1
        })
    );
}

#[test]
fn metadata_lists_every_collection() {
    let (conn, ctx, _) = setup(0);
    let collections = get_collections_metadata(&conn, &ctx).unwrap();
    let encoded = serde_json::to_value(&collections).unwrap();
    assert_eq!(encoded.as_array().unwrap().len(), 2);
    assert!(encoded[0].get("collection_name").is_some());
}

#[test]
fn mutation_acks_and_error_statuses() {
    let (conn, ctx, collection_id) = setup(1);

    let ack = add_company_to_collection(&conn, &ctx, 1, Some("My List")).unwrap();
    assert_eq!(
        serde_json::to_value(&ack).unwrap(),
        json!({"message": "Company added to collection"})
    );
    let duplicate = add_company_to_collection(&conn, &ctx, 1, Some("My List")).unwrap_err();
    assert_eq!(duplicate.status, 409);
    let missing = add_company_to_collection(&conn, &ctx, 1, Some("Unknown")).unwrap_err();
    assert_eq!(missing.status, 404);

    remove_company_from_collection(&conn, &ctx, 1, &collection_id).unwrap();
    let again = remove_company_from_collection(&conn, &ctx, 1, &collection_id).unwrap_err();
    assert_eq!(again.status, 404);

    let bad_id = remove_company_from_collection(&conn, &ctx, 1, "not-a-uuid").unwrap_err();
    assert_eq!(bad_id.status, 422);
}

#[test]
fn negative_paging_is_rejected() {
    let (conn, ctx, collection_id) = setup(1);
    let err = get_collection_page(&conn, &ctx, &collection_id, Some(-1), None).unwrap_err();
    assert_eq!(err.status, 400);
    let err = get_companies(&conn, &ctx, None, Some(-3)).unwrap_err();
    assert_eq!(err.status, 400);
}

#[test]
fn unpaged_listing_of_empty_collection_is_not_found() {
    let (conn, ctx, collection_id) = setup(1);
    let err = get_all_companies_in_collection(&conn, &ctx, &collection_id).unwrap_err();
    assert_eq!(err.status, 404);

    add_company_to_collection(&conn, &ctx, 1, Some("My List")).unwrap();
    let all = get_all_companies_in_collection(&conn, &ctx, &collection_id).unwrap();
    assert_eq!(all.total, 1);
}

#[test]
fn bootstrap_fails_fast_without_liked_collection() {
    let config = CoreConfig {
        liked_collection_name: "Favourites".to_string(),
        ..CoreConfig::default()
    };
    let conn = open_connection(&config).unwrap();
    let err = ApiContext::bootstrap(&conn, config).unwrap_err();
    assert_eq!(err.status, 412);
}

#[test]
fn batch_add_streams_progress_messages() {
    let (conn, ctx, _) = setup(2);
    let mut events = Vec::new();
    let outcome =
        add_companies_to_collection(&conn, &ctx, &[1, 2], None, |event| events.push(event))
            .unwrap();
    assert_eq!(outcome.applied, vec![1, 2]);
    assert_eq!(events.last(), Some(&json!({"message": "Task completed"})));

    let companies = get_companies(&conn, &ctx, None, None).unwrap();
    assert!(companies.companies.iter().all(|company| company.liked));
}

#[test]
fn progress_session_uses_configured_idle_timeout() {
    let config = CoreConfig {
        progress_idle_timeout_ms: Some(30),
        ..CoreConfig::default()
    };
    let conn = open_connection(&config).unwrap();
    let ctx = ApiContext::bootstrap(&conn, config).unwrap();

    let (transport, peer) = memory_pair();
    assert_eq!(progress_session(transport, &ctx), SessionOutcome::IdleTimeout);
    assert_eq!(
        peer.recv(Duration::from_secs(1)),
        Some(ServerFrame::Close)
    );
}

#[test]
fn offset_past_u32_range_pages_empty_with_total() {
    let (conn, ctx, collection_id) = setup(2);
    add_company_to_collection(&conn, &ctx, 1, Some("My List")).unwrap();
    add_company_to_collection(&conn, &ctx, 2, Some("My List")).unwrap();

    let page =
        get_collection_page(&conn, &ctx, &collection_id, Some(5_000_000_000), None).unwrap();
    assert!(page.companies.is_empty());
    assert_eq!(page.total, 2);
}

#[test]
fn default_add_after_liked_collection_removed_is_precondition_failure() {
    let (conn, ctx, _) = setup(1);
    conn.execute(
        "DELETE FROM company_collections WHERE id = ?1;",
        [ctx.liked().id().to_string()],
    )
    .unwrap();

    let err = add_company_to_collection(&conn, &ctx, 1, None).unwrap_err();
    assert_eq!(err.status, 412);
}
