use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, Statement};

use engine::{
    Amount, Engine, EngineError, Entry, EntryFilter, EntryMode, Participants, SessionState,
    entries_for,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn people() -> Participants {
    Participants::new(["Sheyx", "Aziz"], "Split").unwrap()
}

fn amount(units: i64) -> Amount {
    Amount::new(units).unwrap()
}

#[tokio::test]
async fn inserted_entry_round_trips_by_id() {
    let engine = engine_with_db().await;
    let entry = Entry::new("Sheyx", amount(30_000), "borrowed", Utc::now());

    engine.insert_entry(&entry).await.unwrap();
    let fetched = engine.entry(&entry.id).await.unwrap();

    assert_eq!(fetched.name, "Sheyx");
    assert_eq!(fetched.amount, amount(30_000));
    assert_eq!(fetched.note, "borrowed");
    assert!((fetched.time - entry.time).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn missing_entry_is_key_not_found() {
    let engine = engine_with_db().await;

    assert!(matches!(
        engine.entry("nope").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_entry("nope").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn entries_are_listed_newest_first_and_filtered() {
    let engine = engine_with_db().await;
    let now = Utc::now();
    let oldest = Entry::new("Sheyx", amount(1), "", now - Duration::hours(2));
    let middle = Entry::new("Aziz", amount(2), "", now - Duration::hours(1));
    let newest = Entry::new("Sheyx", amount(3), "", now);
    engine
        .insert_entries(&[oldest.clone(), middle.clone(), newest.clone()])
        .await
        .unwrap();

    let all = engine.entries(&EntryFilter::default()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        [newest.id.as_str(), middle.id.as_str(), oldest.id.as_str()]
    );

    let sheyx = engine
        .entries(&EntryFilter::participant("Sheyx"))
        .await
        .unwrap();
    assert_eq!(sheyx.len(), 2);
    assert!(sheyx.iter().all(|e| e.name == "Sheyx"));

    let latest = engine.entries(&EntryFilter::latest(1)).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].id, newest.id);
}

#[tokio::test]
async fn batch_insert_is_all_or_nothing() {
    let engine = engine_with_db().await;
    let first = Entry::new("Sheyx", amount(10), "", Utc::now());
    engine.insert_entry(&first).await.unwrap();

    // Second element reuses an existing primary key, so the batch must fail.
    let fresh = Entry::new("Aziz", amount(20), "", Utc::now());
    let result = engine.insert_entries(&[fresh.clone(), first.clone()]).await;
    assert!(matches!(result, Err(EngineError::Database(_))));

    assert!(matches!(
        engine.entry(&fresh.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(engine.entries(&EntryFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_all_is_idempotent() {
    let engine = engine_with_db().await;
    engine
        .insert_entries(&[
            Entry::new("Sheyx", amount(1), "", Utc::now()),
            Entry::new("Aziz", amount(2), "", Utc::now()),
        ])
        .await
        .unwrap();

    assert_eq!(engine.delete_all().await.unwrap(), 2);
    assert_eq!(engine.delete_all().await.unwrap(), 0);
    assert!(engine.entries(&EntryFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_by_participant_keeps_the_rest() {
    let engine = engine_with_db().await;
    engine
        .insert_entries(&[
            Entry::new("Sheyx", amount(1), "", Utc::now()),
            Entry::new("Aziz", amount(2), "", Utc::now()),
        ])
        .await
        .unwrap();

    let removed = engine
        .delete_entries(&EntryFilter::participant("Sheyx"))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    let left = engine.entries(&EntryFilter::default()).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name, "Aziz");
}

#[tokio::test]
async fn balances_group_stored_amounts() {
    let engine = engine_with_db().await;
    let split = entries_for(
        &SessionState::AwaitingSplitAmount,
        amount(50_000),
        "snacks",
        &people(),
        Utc::now(),
    )
    .unwrap();
    engine.insert_entries(&split).await.unwrap();
    engine
        .insert_entry(&Entry::new("Sheyx", amount(30_000), "borrowed", Utc::now()))
        .await
        .unwrap();

    let balances = engine.balances(&people()).await.unwrap();
    assert_eq!(balances.get("Sheyx"), Some(amount(55_000)));
    assert_eq!(balances.get("Aziz"), Some(amount(25_000)));
    assert_eq!(balances.total(), amount(80_000));
}

#[tokio::test]
async fn sessions_default_to_idle_and_upsert() {
    let engine = engine_with_db().await;
    assert_eq!(engine.session("42").await.unwrap(), SessionState::Idle);

    let choosing = SessionState::AwaitingModeChoice {
        participant: "Sheyx".to_string(),
    };
    engine.save_session("42", &choosing).await.unwrap();
    assert_eq!(engine.session("42").await.unwrap(), choosing);

    let awaiting = SessionState::AwaitingAmount {
        participant: "Sheyx".to_string(),
        mode: EntryMode::Debt,
    };
    engine.save_session("42", &awaiting).await.unwrap();
    assert_eq!(engine.session("42").await.unwrap(), awaiting);

    engine.reset_session("42").await.unwrap();
    assert_eq!(engine.session("42").await.unwrap(), SessionState::Idle);
    assert_eq!(engine.session("7").await.unwrap(), SessionState::Idle);
}

#[tokio::test]
async fn corrupted_session_reads_as_idle() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO sessions (user_id, state, participant, mode, updated_at) VALUES (?, ?, ?, ?, ?)",
        vec![
            "9".into(),
            "amount".into(),
            Option::<String>::None.into(),
            "debt".into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    assert_eq!(engine.session("9").await.unwrap(), SessionState::Idle);
}
