use super::*;

#[tokio::test]
async fn memory_slot_clones_share_entries() {
    let slot = MemorySlot::new();
    let other = slot.clone();

    assert_eq!(slot.get("stories").await.expect("get"), None);
    other.set("stories", "[]").await.expect("set");
    assert_eq!(slot.get("stories").await.expect("get").as_deref(), Some("[]"));
}

#[tokio::test]
async fn sqlite_slot_reads_absent_key_as_none() {
    let slot = SqliteSlot::connect("sqlite::memory:", 5).await.expect("db");
    slot.health_check().await.expect("health check");
    assert_eq!(slot.get("stories").await.expect("get"), None);
}

#[tokio::test]
async fn sqlite_memory_slot_pins_its_only_connection() {
    let slot = SqliteSlot::connect("sqlite::memory:", 5).await.expect("db");
    let options = slot.pool().options();

    assert_eq!(options.get_max_connections(), 1);
    assert_eq!(options.get_min_connections(), 1);
    assert_eq!(options.get_idle_timeout(), None);
    assert_eq!(options.get_max_lifetime(), None);

    slot.set("stories", "[]").await.expect("set");
    assert_eq!(slot.get("stories").await.expect("get").as_deref(), Some("[]"));
}

#[tokio::test]
async fn sqlite_slot_overwrites_whole_value() {
    let slot = SqliteSlot::connect("sqlite::memory:", 5).await.expect("db");

    slot.set("stories", r#"[{"a":1}]"#).await.expect("first set");
    slot.set("stories", "[]").await.expect("second set");
    slot.set("other", "x").await.expect("other key");

    assert_eq!(slot.get("stories").await.expect("get").as_deref(), Some("[]"));
    assert_eq!(slot.get("other").await.expect("get").as_deref(), Some("x"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_slots")
        .fetch_one(slot.pool())
        .await
        .expect("count");
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn sqlite_slot_creates_database_file_and_persists_across_reopen() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("stories.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let slot = SqliteSlot::connect(&database_url, 2).await.expect("db");
    slot.set("stories", "[]").await.expect("set");
    slot.pool().close().await;

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = SqliteSlot::connect(&database_url, 2).await.expect("reopen");
    assert_eq!(
        reopened.get("stories").await.expect("get").as_deref(),
        Some("[]")
    );
}

#[test]
fn parent_dir_is_created_for_file_urls_only() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("a").join("b").join("stories.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    ensure_sqlite_parent_dir_exists(&database_url).expect("create parent");
    assert!(temp_root.path().join("a").join("b").is_dir());

    ensure_sqlite_parent_dir_exists("sqlite::memory:").expect("memory url");
}

#[test]
fn file_path_is_extracted_from_sqlite_urls() {
    assert_eq!(
        sqlite_file_path("sqlite://./data/stories.db?mode=rwc"),
        Some(PathBuf::from("./data/stories.db"))
    );
    assert_eq!(sqlite_file_path("sqlite::memory:"), None);
    assert_eq!(sqlite_file_path("postgres://db"), None);
}
