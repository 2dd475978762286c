use actor_store::mock::{create_mock_client, expect_insert, expect_update, MockClient};
use actor_store::{FrameworkError, ResourceClient, RetirePolicy};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use table_sync::clients::ActorTableStore;
use table_sync::device::NoDevice;
use table_sync::engine::{Caller, TableSyncEngine};
use table_sync::hub::{HubActor, HubClient};
use table_sync::id_generator::IdGenerator;
use table_sync::model::{Table, TableId, TableStatus};
use table_sync::table_actor::TableError;

/// Engine over a scripted store. Ids are drawn from `ids` in order.
fn engine_over(client: ResourceClient<Table>, ids: &[&str]) -> (TableSyncEngine, HubClient) {
    let ids: Vec<TableId> = ids.iter().map(|id| TableId::from(*id)).collect();
    let next = Mutex::new(0usize);
    let source = move || {
        let mut i = next.lock().unwrap();
        let id = ids[*i % ids.len()].clone();
        *i += 1;
        id
    };

    let (hub_actor, hub) = HubActor::new(8, 8);
    tokio::spawn(hub_actor.run());

    let engine = TableSyncEngine::new(
        Arc::new(ActorTableStore::new(client, RetirePolicy::Soft)),
        IdGenerator::with_source(3, source),
        hub.clone(),
        Arc::new(NoDevice),
    );
    (engine, hub)
}

fn caller() -> Caller {
    Caller::new("test")
}

/// Pattern: real engine + scripted store.
/// A concurrent create claims the freshly checked id between `contains` and `insert`.
#[tokio::test]
async fn test_create_retries_once_on_id_race() {
    let (client, mut receiver) = create_mock_client::<Table>(10);
    let (engine, hub) = engine_over(client, &["AAA111", "BBB222"]);
    let mut dashboard = hub.connect().await.unwrap();

    // Store side, answered by hand
    let store = tokio::spawn(async move {
        // Name check
        match receiver.recv().await {
            Some(actor_store::ResourceRequest::FindByKey { key, respond_to }) => {
                assert_eq!(key, "Patio");
                respond_to.send(Ok(None)).unwrap();
            }
            other => panic!("expected FindByKey, got {other:?}"),
        }
        // First draw: free at check time, taken at insert time
        match receiver.recv().await {
            Some(actor_store::ResourceRequest::Contains { id, respond_to }) => {
                assert_eq!(id.as_str(), "AAA111");
                respond_to.send(Ok(false)).unwrap();
            }
            other => panic!("expected Contains, got {other:?}"),
        }
        let (entity, respond_to) = expect_insert(&mut receiver).await.unwrap();
        assert_eq!(entity.id.as_str(), "AAA111");
        respond_to
            .send(Err(FrameworkError::DuplicateId("AAA111".into())))
            .unwrap();
        // Second draw goes through
        match receiver.recv().await {
            Some(actor_store::ResourceRequest::Contains { id, respond_to }) => {
                assert_eq!(id.as_str(), "BBB222");
                respond_to.send(Ok(false)).unwrap();
            }
            other => panic!("expected Contains, got {other:?}"),
        }
        let (entity, respond_to) = expect_insert(&mut receiver).await.unwrap();
        assert_eq!(entity.id.as_str(), "BBB222");
        assert_eq!(entity.name, "Patio");
        respond_to.send(Ok(entity)).unwrap();
    });

    let table = engine.create_table(&caller(), "Patio").await.unwrap();
    assert_eq!(table.id.as_str(), "BBB222");
    store.await.unwrap();

    // Only the successful insert was announced
    assert_eq!(dashboard.recv().await.unwrap().table_id().as_str(), "BBB222");
    assert!(dashboard.try_recv().is_none());
}

#[tokio::test]
async fn test_create_gives_up_after_second_id_race() {
    let mut mock = MockClient::<Table>::new();
    mock.expect_find_by_key("Patio").return_ok(None);
    mock.expect_contains(TableId::from("AAA111")).return_ok(false);
    mock.expect_insert()
        .return_err(FrameworkError::DuplicateId("AAA111".into()));
    mock.expect_contains(TableId::from("BBB222")).return_ok(false);
    mock.expect_insert()
        .return_err(FrameworkError::DuplicateId("BBB222".into()));

    let (engine, _hub) = engine_over(mock.client(), &["AAA111", "BBB222"]);
    let result = engine.create_table(&caller(), "Patio").await;

    assert_eq!(result, Err(TableError::IdConflict("BBB222".into())));
    mock.verify();
}

#[tokio::test]
async fn test_generation_exhausted_never_inserts() {
    let mut mock = MockClient::<Table>::new();
    mock.expect_find_by_key("Patio").return_ok(None);
    for _ in 0..3 {
        mock.expect_contains(TableId::from("AAA111")).return_ok(true);
    }

    let (engine, _hub) = engine_over(mock.client(), &["AAA111"]);
    let result = engine.create_table(&caller(), "Patio").await;

    assert_eq!(result, Err(TableError::GenerationExhausted { attempts: 3 }));
    assert_eq!(result.unwrap_err().http_status(), 500);
    mock.verify();
}

#[tokio::test]
async fn test_store_outage_is_translated() {
    let mut mock = MockClient::<Table>::new();
    mock.expect_find_by_key("Patio")
        .return_err(FrameworkError::ActorClosed);
    mock.expect_list().return_err(FrameworkError::ActorDropped);

    let (engine, _hub) = engine_over(mock.client(), &["AAA111"]);

    let created = engine.create_table(&caller(), "Patio").await;
    assert!(matches!(created, Err(TableError::StoreUnavailable(_))));
    let listed = engine.list_tables(&caller()).await;
    assert!(matches!(listed, Err(TableError::StoreUnavailable(_))));
    assert_eq!(listed.unwrap_err().http_status(), 503);
    mock.verify();
}

/// The store is asked about the trimmed name, not the raw input.
#[tokio::test]
async fn test_name_check_uses_trimmed_name() {
    let mut mock = MockClient::<Table>::new();
    let holder = Table::new(TableId::from("CCC333"), "Patio", Utc::now());
    mock.expect_find_by_key("Patio").return_ok(Some(holder));

    let (engine, _hub) = engine_over(mock.client(), &["AAA111"]);
    let result = engine.create_table(&caller(), "  Patio  ").await;

    assert_eq!(result, Err(TableError::DuplicateName("Patio".into())));
    mock.verify();
}

/// The name was free when checked but another rename took it before the write.
#[tokio::test]
async fn test_rename_race_surfaces_duplicate_name() {
    let mut mock = MockClient::<Table>::new();
    mock.expect_find_by_key("Garden").return_ok(None);
    mock.expect_update(TableId::from("AAA111"))
        .return_err(FrameworkError::DuplicateKey("Garden".into()));

    let (engine, _hub) = engine_over(mock.client(), &["AAA111"]);
    let result = engine.rename_table(&caller(), "AAA111", "Garden").await;

    assert_eq!(result, Err(TableError::DuplicateName("Garden".into())));
    mock.verify();
}

#[tokio::test]
async fn test_status_write_carries_only_the_status() {
    let (client, mut receiver) = create_mock_client::<Table>(10);
    let (engine, hub) = engine_over(client, &["AAA111"]);
    let mut dashboard = hub.connect().await.unwrap();
    let before = Utc::now();

    let store = tokio::spawn(async move {
        let (id, patch, respond_to) = expect_update(&mut receiver).await.unwrap();
        assert_eq!(id.as_str(), "AAA111");
        assert_eq!(patch.status, Some(TableStatus::Delivered));
        assert_eq!(patch.name, None);
        assert_eq!(patch.is_active, None);
        assert!(patch.touched_at >= before);

        let mut table = Table::new(id, "Patio", before);
        table.status = TableStatus::Delivered;
        table.updated_at = patch.touched_at;
        respond_to.send(Ok(table)).unwrap();
    });

    let change = engine
        .update_status(&caller(), "AAA111", "delivered")
        .await
        .unwrap();
    store.await.unwrap();

    assert!(!change.device_notified);
    assert_eq!(change.table.status, TableStatus::Delivered);
    assert_eq!(dashboard.recv().await.unwrap().name(), "status_update");
}

#[tokio::test]
async fn test_missing_table_broadcasts_nothing() {
    let mut mock = MockClient::<Table>::new();
    mock.expect_update(TableId::from("ZZZ999"))
        .return_err(FrameworkError::NotFound("ZZZ999".into()));
    mock.expect_delete(TableId::from("ZZZ999"))
        .return_err(FrameworkError::NotFound("ZZZ999".into()));
    mock.expect_get(TableId::from("ZZZ999")).return_ok(None);

    let (engine, hub) = engine_over(mock.client(), &["AAA111"]);
    let mut dashboard = hub.connect().await.unwrap();

    let updated = engine.update_status(&caller(), "ZZZ999", "placed").await;
    assert_eq!(updated, Err(TableError::NotFound("ZZZ999".into())));
    let deleted = engine.delete_table(&caller(), "ZZZ999").await;
    assert_eq!(deleted, Err(TableError::NotFound("ZZZ999".into())));
    let polled = engine.table_status("ZZZ999").await;
    assert_eq!(polled, Err(TableError::NotFound("ZZZ999".into())));

    assert!(dashboard.try_recv().is_none());
    mock.verify();
}
