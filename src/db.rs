use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

/// Outcome of a failed store call, tagged so handlers can tell a uniqueness
/// clash apart from everything else.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Conflict,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        let unique = e
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        if unique {
            StoreError::Conflict
        } else {
            StoreError::Database(e)
        }
    }
}

fn connect_options(url: &str) -> anyhow::Result<SqliteConnectOptions> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("parse database url {url}"))?
        .create_if_missing(true)
        // References between tables are documentation only.
        .foreign_keys(false);
    Ok(opts)
}

/// `create_if_missing` makes the file only; its directory must exist first.
async fn ensure_parent_dir(opts: &SqliteConnectOptions) -> anyhow::Result<()> {
    let filename = opts.clone().get_filename();
    let Some(dir) = filename
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
    else {
        return Ok(());
    };
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("create database directory {}", dir.display()))
}

pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let opts = connect_options(url)?;
    ensure_parent_dir(&opts).await?;
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Every connection to `sqlite::memory:` is its own database, so the pool is
/// pinned to one connection that never gets recycled.
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options("sqlite::memory:")?)
        .await
        .context("connect to in-memory database")?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_maps_to_conflict() {
        let db = connect_in_memory().await.expect("in-memory db");
        let insert = "INSERT INTO users (first_name, last_name, email, organization, password_hash) \
                      VALUES ('a', 'b', 'dup@x.com', '', 'h')";
        sqlx::query(insert).execute(&db).await.expect("first insert");
        let err = sqlx::query(insert).execute(&db).await.unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Conflict));
    }

    #[tokio::test]
    async fn connect_creates_missing_directories() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let file = tmp.path().join("instance").join("nested").join("users.db");
        let url = format!("sqlite://{}", file.display());

        let db = connect(&url).await.expect("connect creates the store");
        migrate(&db).await.expect("migrations run on a fresh file");
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&db)
            .await
            .expect("users table exists");
        assert_eq!(users, 0);
        assert!(file.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn other_failures_stay_database_errors() {
        let db = connect_in_memory().await.expect("in-memory db");
        let err = sqlx::query("SELECT * FROM no_such_table")
            .execute(&db)
            .await
            .unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Database(_)));
    }
}
