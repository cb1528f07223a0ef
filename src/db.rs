use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .connect_with(connect_options)
            .await?;

        Ok(Database { pool })
    }

    /// Private in-memory database. A single connection that is never recycled,
    /// since every SQLite memory connection is its own database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?;

        Ok(Database { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        let migrations = [
            include_str!("../migrations/sqlite/001_initial.sql"),
            include_str!("../migrations/sqlite/002_seed_component_types.sql"),
        ];

        for (idx, migration_sql) in migrations.iter().enumerate() {
            tracing::info!("Running migration {}", idx + 1);

            for statement in migration_sql.split(';') {
                let sql = strip_comment_lines(statement);
                if sql.is_empty() {
                    continue;
                }
                if let Err(e) = sqlx::query(&sql).execute(&self.pool).await {
                    if e.to_string().contains("already exists") {
                        tracing::debug!("Skipping existing object in migration {}: {}", idx + 1, e);
                    } else {
                        tracing::warn!(
                            "Error in migration {} statement: {} - Error: {}",
                            idx + 1,
                            sql,
                            e
                        );
                        return Err(e.into());
                    }
                }
            }
        }

        tracing::info!("All migrations completed");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn strip_comment_lines(statement: &str) -> String {
    statement
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment_lines() {
        assert_eq!(
            strip_comment_lines("-- heading\n\nCREATE TABLE t (id TEXT)\n"),
            "CREATE TABLE t (id TEXT)"
        );
        assert_eq!(strip_comment_lines("\n-- only a comment\n"), "");
    }

    #[tokio::test]
    async fn test_migrations_seed_catalog_and_are_rerunnable() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM component_types")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 12);
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = sqlx::query(
            "INSERT INTO page_components (id, page_id, component_type_id, position, config, created_at, updated_at)
             VALUES ('c1', 'missing-page', 'ct-heading', 0, '{}', 0, 0)",
        )
        .execute(db.pool())
        .await;
        assert!(result.is_err());
    }
}
