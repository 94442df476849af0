use crate::db::models::CredentialRecord;
use crate::db::schema::SQLITE_INIT;
use crate::error::VaultError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// Persistent table of credential records.
///
/// Sites may repeat; every lookup resolves to the oldest matching row
/// (lowest id). Each method is a single statement, so it either commits
/// fully or leaves the table untouched.
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, VaultError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        debug!(database_url, "record store ready");
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), VaultError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a row. Returns the assigned id.
    pub async fn create(
        &self,
        site: &str,
        user: &str,
        encrypted_password: &str,
    ) -> Result<i64, VaultError> {
        let now = Utc::now().to_rfc3339();
        let res = sqlx::query(
            r#"INSERT INTO passwords (site, user, password, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(site)
        .bind(user)
        .bind(encrypted_password)
        .bind(now.as_str())
        .bind(now.as_str())
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn find_by_site(&self, site: &str) -> Result<Option<CredentialRecord>, VaultError> {
        let row = sqlx::query(
            r#"SELECT id, site, user, password, created_at, updated_at
               FROM passwords WHERE site = ? ORDER BY id LIMIT 1"#,
        )
        .bind(site)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Replace the password token of the first row for `site`.
    /// Returns whether a row was updated.
    pub async fn update_password(
        &self,
        site: &str,
        new_encrypted_password: &str,
    ) -> Result<bool, VaultError> {
        let res = sqlx::query(
            r#"UPDATE passwords SET password = ?, updated_at = ?
               WHERE id = (SELECT id FROM passwords WHERE site = ? ORDER BY id LIMIT 1)"#,
        )
        .bind(new_encrypted_password)
        .bind(Utc::now().to_rfc3339())
        .bind(site)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Remove the first row for `site`. Returns whether a row was removed.
    pub async fn delete(&self, site: &str) -> Result<bool, VaultError> {
        let res = sqlx::query(
            r#"DELETE FROM passwords
               WHERE id = (SELECT id FROM passwords WHERE site = ? ORDER BY id LIMIT 1)"#,
        )
        .bind(site)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, VaultError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passwords")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_model(row: SqliteRow) -> Result<CredentialRecord, VaultError> {
        let id: i64 = row.try_get("id")?;
        let site: String = row.try_get("site")?;
        let user: String = row.try_get("user")?;
        let password: String = row.try_get("password")?;
        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        Ok(CredentialRecord {
            id,
            site,
            user,
            password,
            created_at: Self::parse_timestamp(&created_at_str)?,
            updated_at: Self::parse_timestamp(&updated_at_str)?,
        })
    }

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, VaultError> {
        Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc))
    }
}
