use cms_core::db::open_db_in_memory;
use cms_core::{
    content_schemas, BackendError, Fields, MemoryRecordStore, RecordStore, SqliteRecordStore,
    StoreError, ValidationError,
};
use serde_json::json;
use uuid::Uuid;

fn fields(value: serde_json::Value) -> Fields {
    value.as_object().cloned().unwrap()
}

fn with_each_store(check: impl Fn(&dyn RecordStore)) {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteRecordStore::try_new(&conn, content_schemas()).unwrap();
    check(&sqlite);

    let memory = MemoryRecordStore::new(content_schemas());
    check(&memory);
}

#[test]
fn unknown_collection_lists_empty() {
    with_each_store(|store| {
        assert!(store.list("nonexistent").unwrap().is_empty());
    });
}

#[test]
fn insert_assigns_id_and_equal_timestamps() {
    with_each_store(|store| {
        let record = store
            .insert("services", fields(json!({"title": "AI Strategy"})))
            .unwrap();

        assert_eq!(record.collection, "services");
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.fields["title"], "AI Strategy");

        let loaded = store.get("services", record.id).unwrap().unwrap();
        assert_eq!(loaded, record);
    });
}

#[test]
fn caller_supplied_metadata_is_ignored() {
    with_each_store(|store| {
        let forged = Uuid::new_v4();
        let record = store
            .insert(
                "services",
                fields(json!({
                    "title": "Cloud",
                    "id": forged.to_string(),
                    "created_at": 1,
                    "updated_at": 2
                })),
            )
            .unwrap();

        assert_ne!(record.id, forged);
        assert!(record.created_at > 2);
        assert!(!record.fields.contains_key("id"));
        assert!(!record.fields.contains_key("created_at"));
    });
}

#[test]
fn list_returns_newest_first() {
    with_each_store(|store| {
        let first = store
            .insert("services", fields(json!({"title": "first"})))
            .unwrap();
        let second = store
            .insert("services", fields(json!({"title": "second"})))
            .unwrap();
        let third = store
            .insert("services", fields(json!({"title": "third"})))
            .unwrap();

        let ids: Vec<_> = store
            .list("services")
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    });
}

#[test]
fn collections_are_isolated() {
    with_each_store(|store| {
        store
            .insert("services", fields(json!({"title": "only here"})))
            .unwrap();
        assert!(store.list("solutions").unwrap().is_empty());
    });
}

#[test]
fn update_merges_fields_and_advances_updated_at() {
    with_each_store(|store| {
        let created = store
            .insert(
                "services",
                fields(json!({"title": "Automation", "icon": "Zap"})),
            )
            .unwrap();

        let first = store
            .update("services", created.id, fields(json!({"title": "Automation+"})))
            .unwrap();
        let second = store
            .update("services", created.id, fields(json!({"color": "blue"})))
            .unwrap();

        assert_eq!(first.created_at, created.created_at);
        assert!(first.updated_at > created.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.fields["title"], "Automation+");
        assert_eq!(second.fields["icon"], "Zap");
        assert_eq!(second.fields["color"], "blue");
    });
}

#[test]
fn update_of_missing_record_is_not_found() {
    with_each_store(|store| {
        let err = store
            .update("services", Uuid::new_v4(), fields(json!({"title": "x"})))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection, .. } if collection == "services"));
    });
}

#[test]
fn remove_twice_reports_not_found() {
    with_each_store(|store| {
        let record = store
            .insert("services", fields(json!({"title": "temp"})))
            .unwrap();

        store.remove("services", record.id).unwrap();
        assert!(store.get("services", record.id).unwrap().is_none());
        assert!(matches!(
            store.remove("services", record.id).unwrap_err(),
            StoreError::NotFound { .. }
        ));
    });
}

#[test]
fn registered_shapes_are_enforced_before_writing() {
    with_each_store(|store| {
        let missing = store
            .insert("services", fields(json!({"description": "no title"})))
            .unwrap_err();
        assert!(matches!(
            missing,
            StoreError::Validation(ValidationError::MissingField(ref name)) if name == "title"
        ));

        let mistyped = store
            .insert(
                "pricing_plans",
                fields(json!({"name": "Pro", "monthly_price": "49", "annual_price": 470})),
            )
            .unwrap_err();
        assert!(matches!(
            mistyped,
            StoreError::Validation(ValidationError::WrongType { .. })
        ));

        assert!(store.list("services").unwrap().is_empty());
        assert!(store.list("pricing_plans").unwrap().is_empty());
    });
}

#[test]
fn null_values_and_undeclared_link_keys_are_rejected() {
    with_each_store(|store| {
        let null_field = store
            .insert("services", fields(json!({"title": "X", "description": null})))
            .unwrap_err();
        assert!(matches!(
            null_field,
            StoreError::Validation(ValidationError::WrongType { ref field, .. }) if field == "description"
        ));

        let unknown_link = store
            .insert(
                "team_members",
                fields(json!({
                    "name": "Ava",
                    "role": "CTO",
                    "social": {"mastodon": "https://x.example"}
                })),
            )
            .unwrap_err();
        assert!(matches!(
            unknown_link,
            StoreError::Validation(ValidationError::UnknownField(ref name)) if name == "social.mastodon"
        ));

        assert!(store.list("services").unwrap().is_empty());
        assert!(store.list("team_members").unwrap().is_empty());
    });
}

#[test]
fn unregistered_collections_accept_any_object() {
    with_each_store(|store| {
        let record = store
            .insert("drafts", fields(json!({"anything": [1, 2, 3]})))
            .unwrap();
        assert_eq!(record.fields["anything"], json!([1, 2, 3]));
    });
}

#[test]
fn dropped_table_surfaces_as_backend_unavailable() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, content_schemas()).unwrap();
    conn.execute_batch("DROP TABLE records;").unwrap();

    assert!(matches!(
        store.list("services").unwrap_err(),
        StoreError::BackendUnavailable(BackendError::Db(_))
    ));
}

#[test]
fn undecodable_row_is_reported_as_malformed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, content_schemas()).unwrap();
    conn.execute(
        "INSERT INTO records (collection, id, fields, created_at, updated_at)
         VALUES ('services', 'not-a-uuid', '{\"title\":\"broken\"}', 1, 1);",
        [],
    )
    .unwrap();

    assert!(matches!(
        store.list("services").unwrap_err(),
        StoreError::BackendUnavailable(BackendError::MalformedRecord(_))
    ));
}

#[test]
fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cms.db");

    let id = {
        let conn = cms_core::db::open_db(&path, cms_core::db::DEFAULT_BUSY_TIMEOUT).unwrap();
        let store = SqliteRecordStore::try_new(&conn, content_schemas()).unwrap();
        store
            .insert("services", fields(json!({"title": "Durable"})))
            .unwrap()
            .id
    };

    let conn = cms_core::db::open_db(&path, cms_core::db::DEFAULT_BUSY_TIMEOUT).unwrap();
    let store = SqliteRecordStore::try_new(&conn, content_schemas()).unwrap();
    let record = store.get("services", id).unwrap().unwrap();
    assert_eq!(record.fields["title"], "Durable");
}
