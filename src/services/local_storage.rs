//! Local persistent storage for a handful of named keys.
//!
//! Backed by the `local_storage` SQLite table. An absent key reads as unset,
//! and flags read as `false` unless the stored value is exactly `"true"`.

use crate::db::pool::DbPool;
use crate::error::AppError;

/// Keys the portal persists between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    CsrfToken,
    IsTermsOfServiceApproved,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CsrfToken => "csrfToken",
            Self::IsTermsOfServiceApproved => "isTermsOfServiceApproved",
        }
    }
}

/// Key/value store over the portal database.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pool: DbPool,
}

impl LocalStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Read a stored value.
    pub async fn get(&self, key: StorageKey) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM local_storage WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Store a value, replacing any previous one.
    pub async fn set(&self, key: StorageKey, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?, ?, strftime('%s', 'now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage_with_op(e.to_string(), format!("set {}", key.as_str())))?;

        Ok(())
    }

    /// Remove a value. Removing an absent key is not an error.
    pub async fn remove(&self, key: StorageKey) -> Result<(), AppError> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Read a boolean flag; anything but `"true"` is false.
    pub async fn is_flag_set(&self, key: StorageKey) -> Result<bool, AppError> {
        Ok(self.get(key).await?.as_deref() == Some("true"))
    }

    /// Store a boolean flag as `"true"`/`"false"`.
    pub async fn set_flag(&self, key: StorageKey, value: bool) -> Result<(), AppError> {
        self.set(key, if value { "true" } else { "false" }).await
    }
}
