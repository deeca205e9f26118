use dealbook_core::db::open_db_in_memory;
use dealbook_core::progress::ProgressMessage;
use dealbook_core::{
    Collection, CollectionId, CollectionRef, CollectionStore, Company, CompanyStore,
    LikedCollection, LikedStatusEnricher, Membership, MembershipIndex, MembershipService,
    ServiceError, SqliteStore, LIKED_COLLECTION_NAME,
};
use rusqlite::Connection;
use serde_json::json;
use uuid::Uuid;

struct Fixture {
    conn: Connection,
    target: CollectionId,
}

impl Fixture {
    fn new(companies: i64) -> Self {
        let conn = open_db_in_memory().unwrap();
        let target = Collection::new("Targets");
        {
            let store = SqliteStore::try_new(&conn).unwrap();
            for id in 1..=companies {
                store
                    .insert_company(&Company::new(id, format!("Company {id}")))
                    .unwrap();
            }
            store.insert_collection(&target).unwrap();
        }
        Self {
            conn,
            target: target.id,
        }
    }

    fn store(&self) -> SqliteStore<'_> {
        SqliteStore::try_new(&self.conn).unwrap()
    }

    fn liked(&self) -> LikedCollection {
        LikedCollection::resolve(&self.store(), LIKED_COLLECTION_NAME).unwrap()
    }

    fn service(&self) -> MembershipService<SqliteStore<'_>> {
        MembershipService::new(self.store(), self.liked())
    }

    fn liked_flag(&self, company_id: i64) -> bool {
        let store = self.store();
        LikedStatusEnricher::new(self.liked())
            .enrich(&store, &[company_id])
            .unwrap()[0]
            .liked
    }
}

#[test]
fn add_then_remove_restores_member_count() {
    let fixture = Fixture::new(3);
    let service = fixture.service();
    let store = fixture.store();
    let before = store.count_members(fixture.target).unwrap();

    let ack = service.add_to_collection(2, Some("Targets")).unwrap();
    assert_eq!(ack.message, "Company added to collection");
    assert_eq!(store.count_members(fixture.target).unwrap(), before + 1);

    let ack = service.remove_from_collection(2, fixture.target).unwrap();
    assert_eq!(ack.message, "Company removed from collection");
    assert_eq!(store.count_members(fixture.target).unwrap(), before);
}

#[test]
fn duplicate_add_conflicts_and_counts_once() {
    let fixture = Fixture::new(1);
    let service = fixture.service();

    service.add_to_collection(1, Some("Targets")).unwrap();
    let err = service.add_to_collection(1, Some("Targets")).unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateMembership(_)));
    assert_eq!(err.status_code(), 409);
    assert_eq!(fixture.store().count_members(fixture.target).unwrap(), 1);
}

#[test]
fn add_defaults_to_liked_collection_and_flips_liked_flag() {
    let fixture = Fixture::new(2);
    let service = fixture.service();
    assert!(!fixture.liked_flag(1));

    service.add_to_collection(1, None).unwrap();
    assert!(fixture.liked_flag(1));
    assert!(!fixture.liked_flag(2));

    service.unlike(1).unwrap();
    assert!(!fixture.liked_flag(1));
}

#[test]
fn like_by_explicit_reserved_name_matches_default() {
    let fixture = Fixture::new(1);
    let service = fixture.service();

    service
        .add_to_collection(1, Some(LIKED_COLLECTION_NAME))
        .unwrap();
    assert!(matches!(
        service.like(1),
        Err(ServiceError::DuplicateMembership(_))
    ));
}

#[test]
fn add_to_unknown_collection_name_is_not_found() {
    let fixture = Fixture::new(1);
    let err = fixture
        .service()
        .add_to_collection(1, Some("Nope"))
        .unwrap_err();
    match err {
        ServiceError::CollectionNotFound(CollectionRef::Name(name)) => assert_eq!(name, "Nope"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn add_unknown_company_is_not_found() {
    let fixture = Fixture::new(1);
    let err = fixture
        .service()
        .add_to_collection(77, Some("Targets"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::CompanyNotFound(77)));
    assert_eq!(fixture.store().count_members(fixture.target).unwrap(), 0);
}

#[test]
fn remove_reports_missing_collection_and_missing_membership() {
    let fixture = Fixture::new(1);
    let service = fixture.service();

    let err = service.remove_from_collection(1, Uuid::new_v4()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::CollectionNotFound(CollectionRef::Id(_))
    ));

    let err = service.remove_from_collection(1, fixture.target).unwrap_err();
    assert!(matches!(err, ServiceError::MembershipNotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn batch_add_reports_per_item_outcomes_and_progress() {
    let fixture = Fixture::new(4);
    let service = fixture.service();
    service.add_to_collection(2, Some("Targets")).unwrap();

    let mut events = Vec::new();
    let outcome = service
        .add_companies(&[1, 2, 3, 99], Some("Targets"), |message| {
            events.push(message.to_value())
        })
        .unwrap();

    assert_eq!(outcome.applied, vec![1, 3]);
    assert_eq!(outcome.unchanged, vec![2]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, 99);
    assert_eq!(
        events,
        vec![
            json!({"progress_percentage": 25}),
            json!({"progress_percentage": 50}),
            json!({"progress_percentage": 75}),
            json!({"progress_percentage": 100}),
            json!({"message": "Task completed"}),
        ]
    );
    assert_eq!(fixture.store().count_members(fixture.target).unwrap(), 3);
}

#[test]
fn batch_remove_requires_existing_collection() {
    let fixture = Fixture::new(3);
    let service = fixture.service();
    service
        .add_companies(&[1, 2], Some("Targets"), |_| {})
        .unwrap();

    let err = service
        .remove_companies(&[1], Uuid::new_v4(), |_| {})
        .unwrap_err();
    assert!(matches!(err, ServiceError::CollectionNotFound(_)));

    let mut last = None;
    let outcome = service
        .remove_companies(&[1, 3], fixture.target, |message: &ProgressMessage| {
            last = Some(message.clone())
        })
        .unwrap();
    assert_eq!(outcome.applied, vec![1]);
    assert_eq!(outcome.unchanged, vec![3]);
    assert!(last.expect("completion emitted").is_completion());
}

#[test]
fn batch_to_unknown_collection_applies_nothing() {
    let fixture = Fixture::new(2);
    let mut calls = 0;
    let err = fixture
        .service()
        .add_companies(&[1, 2], Some("Missing"), |_| calls += 1)
        .unwrap_err();
    assert!(matches!(err, ServiceError::CollectionNotFound(_)));
    assert_eq!(calls, 0);
}

#[test]
fn default_add_and_unlike_require_liked_collection() {
    let fixture = Fixture::new(1);
    let service = fixture.service();
    let liked = fixture.liked();
    service.like(1).unwrap();
    fixture
        .conn
        .execute(
            "DELETE FROM company_collections WHERE id = ?1;",
            [liked.id().to_string()],
        )
        .unwrap();

    let err = service.add_to_collection(1, None).unwrap_err();
    assert!(matches!(
        &err,
        ServiceError::MissingDefaultCollection(name) if name == liked.name()
    ));
    assert_eq!(err.status_code(), 412);

    let err = service.unlike(1).unwrap_err();
    assert!(matches!(err, ServiceError::MissingDefaultCollection(_)));

    service.add_to_collection(1, Some("Targets")).unwrap();
}

#[test]
fn add_by_name_is_visible_through_the_index() {
    let fixture = Fixture::new(2);
    let store = fixture.store();
    let member = Membership::new(2, fixture.target);
    assert!(!store.contains(member).unwrap());

    fixture.service().add_to_collection(2, Some("Targets")).unwrap();
    assert!(store.contains(member).unwrap());
    assert!(!store.contains(Membership::new(1, fixture.target)).unwrap());
}
