//! Rule store initialization, seeding and read queries

use fuzzydx_common::db::{
    count_symptoms, default_catalog, init_database, list_diseases, list_rules, list_symptoms,
    seed_default_catalog, SeverityBand,
};
use tempfile::TempDir;

async fn fresh_pool() -> (TempDir, sqlx::SqlitePool) {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = init_database(&dir.path().join("fuzzydx.db"))
        .await
        .expect("database should initialize");
    (dir, pool)
}

#[tokio::test]
async fn test_init_creates_empty_tables() {
    let (_dir, pool) = fresh_pool().await;

    assert_eq!(count_symptoms(&pool).await.unwrap(), 0);
    assert!(list_diseases(&pool).await.unwrap().is_empty());
    assert!(list_rules(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("fuzzydx.db");

    let pool = init_database(&db_path).await.unwrap();
    seed_default_catalog(&pool).await.unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    assert_eq!(count_symptoms(&pool).await.unwrap(), 5);
}

#[tokio::test]
async fn test_seed_populates_reference_catalogue() {
    let (_dir, pool) = fresh_pool().await;

    assert!(seed_default_catalog(&pool).await.unwrap());

    let symptoms = list_symptoms(&pool).await.unwrap();
    let diseases = list_diseases(&pool).await.unwrap();
    let rules = list_rules(&pool).await.unwrap();

    let expected = default_catalog();
    assert_eq!(symptoms, expected.symptoms);
    assert_eq!(diseases, expected.diseases);
    assert_eq!(rules, expected.rules);
}

#[tokio::test]
async fn test_seed_skips_populated_store() {
    let (_dir, pool) = fresh_pool().await;

    assert!(seed_default_catalog(&pool).await.unwrap());
    assert!(!seed_default_catalog(&pool).await.unwrap());
    assert_eq!(list_rules(&pool).await.unwrap().len(), 25);
}

#[tokio::test]
async fn test_concurrent_seeds_write_once() {
    let (_dir, pool) = fresh_pool().await;

    let (first, second) = tokio::join!(seed_default_catalog(&pool), seed_default_catalog(&pool));
    let first = first.expect("first seed should not fail");
    let second = second.expect("second seed should not fail");

    assert!(first ^ second, "exactly one seed writes: {} {}", first, second);
    assert_eq!(count_symptoms(&pool).await.unwrap(), 5);
    assert_eq!(list_diseases(&pool).await.unwrap().len(), 8);
    assert_eq!(list_rules(&pool).await.unwrap().len(), 25);
}

#[tokio::test]
async fn test_rules_keep_authoring_order() {
    let (_dir, pool) = fresh_pool().await;
    seed_default_catalog(&pool).await.unwrap();

    let rules = list_rules(&pool).await.unwrap();
    let ids: Vec<i64> = rules.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    let last = rules.last().unwrap();
    assert_eq!(last.severity, SeverityBand::Medium);
    assert!((last.weight - 0.7).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_duplicate_rules_are_accepted() {
    let (_dir, pool) = fresh_pool().await;
    seed_default_catalog(&pool).await.unwrap();

    sqlx::query(
        "INSERT INTO disease_rules (disease_id, symptom_id, severity, weight) VALUES (1, 1, 'medium', 0.2)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let rules = list_rules(&pool).await.unwrap();
    let duplicates = rules
        .iter()
        .filter(|r| r.disease_id == 1 && r.symptom_id == 1)
        .count();
    assert_eq!(duplicates, 2);
}

#[tokio::test]
async fn test_invalid_symptom_range_rejected_by_schema() {
    let (_dir, pool) = fresh_pool().await;

    let result = sqlx::query(
        "INSERT INTO symptoms (name, min_value, max_value, unit) VALUES ('Broken', 10, 5, 'scale')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "CHECK (min_value < max_value) should reject the row");
}
