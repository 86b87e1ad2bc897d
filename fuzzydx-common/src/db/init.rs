//! Database initialization
//!
//! Opens (or creates) the rule store database and creates its tables.
//! Table creation is idempotent; there are no migrations.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Open the rule store at `db_path`, creating file and tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Applied to every pooled connection
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_symptoms_table(&pool).await?;
    create_diseases_table(&pool).await?;
    create_disease_rules_table(&pool).await?;

    Ok(pool)
}

async fn create_symptoms_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS symptoms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            min_value REAL NOT NULL,
            max_value REAL NOT NULL,
            unit TEXT NOT NULL DEFAULT '',
            CHECK (min_value < max_value)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_diseases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS diseases (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// No uniqueness on (disease_id, symptom_id): duplicate rows are legal and
/// are summed by the aggregator.
async fn create_disease_rules_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS disease_rules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            disease_id INTEGER NOT NULL REFERENCES diseases(id) ON DELETE CASCADE,
            symptom_id INTEGER NOT NULL REFERENCES symptoms(id) ON DELETE CASCADE,
            severity TEXT NOT NULL CHECK (severity IN ('low', 'medium', 'high')),
            weight REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_disease_rules_disease ON disease_rules(disease_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
