#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use survey_storage::{SqliteStore, SubmitSurveyRequest};

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("survey_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn submit(store: &mut SqliteStore, category: &str) -> i64 {
    let mut ratings = BTreeMap::new();
    ratings.insert("quality".to_string(), 4);
    let mut feedback = BTreeMap::new();
    feedback.insert("comments".to_string(), "fine".to_string());
    store
        .submit_survey(SubmitSurveyRequest {
            category: category.to_string(),
            ratings,
            feedback,
            submitted_at_ms: 1_000,
        })
        .expect("submit")
}

#[test]
fn reset_empties_store_and_restarts_identity() {
    let storage_dir = temp_dir("reset_identity");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    submit(&mut store, "A");
    submit(&mut store, "B");
    submit(&mut store, "C");

    store.reset_all().expect("reset");

    assert!(store.list_surveys().expect("list").is_empty());
    let stats = store.summary_stats().expect("stats");
    assert_eq!(stats.total_responses, 0);
    assert_eq!(stats.total_rating_rows, 0);
    assert_eq!(stats.feedback_count, 0);

    let id = submit(&mut store, "Fresh");
    assert_eq!(id, 1, "identity restarts at 1 after reset");
}

#[test]
fn reset_is_convergent() {
    let storage_dir = temp_dir("reset_convergent");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    submit(&mut store, "A");
    store.reset_all().expect("first reset");
    store.reset_all().expect("second reset");
    assert!(store.list_surveys().expect("list").is_empty());

    // Reset on a store that never saw a submit is also fine.
    let other_dir = temp_dir("reset_convergent_fresh");
    let mut fresh = SqliteStore::open(&other_dir).expect("open fresh store");
    fresh.reset_all().expect("reset fresh");
}

#[test]
fn options_upsert_and_survive_reset() {
    let storage_dir = temp_dir("options");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    assert_eq!(store.option_get("admin_hash").expect("get absent"), None);

    store
        .option_set("admin_hash", "first", 1_000)
        .expect("set first");
    assert_eq!(
        store.option_get("admin_hash").expect("get first"),
        Some("first".to_string())
    );

    store
        .option_set("admin_hash", "second", 2_000)
        .expect("overwrite");
    assert_eq!(
        store.option_get("admin_hash").expect("get second"),
        Some("second".to_string())
    );

    submit(&mut store, "A");
    store.reset_all().expect("reset");
    assert_eq!(
        store.option_get("admin_hash").expect("get after reset"),
        Some("second".to_string()),
        "reset clears survey data only"
    );
}

#[test]
fn store_reopens_with_data_intact() {
    let storage_dir = temp_dir("reopen");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    submit(&mut store, "Persisted");
    drop(store);

    let reopened = SqliteStore::open(&storage_dir).expect("reopen store");
    let records = reopened.list_surveys().expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "Persisted");
}
