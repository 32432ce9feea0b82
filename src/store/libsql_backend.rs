//! libSQL backend — async `ProfileStore` implementation.
//!
//! Supports local file and in-memory databases. Each user's progress record is
//! one JSON row; `current_step` and `registration_completed_at` are mirrored
//! into their own columns for ad-hoc queries.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::onboarding::ProgressRecord;
use crate::store::migrations;
use crate::store::traits::ProfileStore;

/// libSQL progress-record store.
///
/// One shared connection serves every request.
pub struct LibSqlProfileStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlProfileStore {
    /// Open the progress database at `path`, creating it and its parent directory if needed.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(&store.conn).await?;
        info!(path = %path.display(), "Profile store opened");
        Ok(store)
    }

    /// Throwaway in-memory store.
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StoreError::Unavailable(format!("Failed to create in-memory database: {e}"))
            })?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(&store.conn).await?;
        Ok(store)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Unavailable(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }
}

fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

#[async_trait]
impl ProfileStore for LibSqlProfileStore {
    async fn load(&self, user_id: &str) -> Result<Option<ProgressRecord>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT record FROM onboarding_progress WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| StoreError::Unavailable(format!("load: {e}")))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(StoreError::Unavailable(format!("load: {e}"))),
        };

        let raw: String = row.get(0).map_err(|e| StoreError::Corrupt {
            user_id: user_id.to_string(),
            reason: e.to_string(),
        })?;
        let record = serde_json::from_str::<ProgressRecord>(&raw).map_err(|e| {
            StoreError::Corrupt {
                user_id: user_id.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Some(record))
    }

    async fn save(&self, user_id: &str, record: &ProgressRecord) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let raw = serde_json::to_string(record).map_err(|e| StoreError::Corrupt {
            user_id: user_id.to_string(),
            reason: e.to_string(),
        })?;
        let completed_at = record.registration_completed_at.map(|t| t.to_rfc3339());

        self.conn
            .execute(
                "INSERT INTO onboarding_progress
                    (user_id, record, current_step, registration_completed_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (user_id) DO UPDATE SET
                    record = ?2, current_step = ?3, registration_completed_at = ?4, updated_at = ?5",
                params![
                    user_id,
                    raw,
                    opt_text(record.current_step.as_deref()),
                    opt_text(completed_at.as_deref()),
                    now
                ],
            )
            .await
            .map_err(|e| StoreError::Unavailable(format!("save: {e}")))?;

        debug!(user_id, step = ?record.current_step, "Progress record saved");
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        let count = self
            .conn
            .execute(
                "DELETE FROM onboarding_progress WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| StoreError::Unavailable(format!("delete: {e}")))?;
        Ok(count > 0)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> LibSqlProfileStore {
        LibSqlProfileStore::new_memory().await.unwrap()
    }

    fn sample_record() -> ProgressRecord {
        ProgressRecord {
            current_step: Some("preferred_days".into()),
            selected_activities: vec!["running".into(), "yoga".into()],
            selected_goals: vec!["get-faster".into(), "stay-active".into()],
            detail_payload: serde_json::json!({"location": {"city": "Leeds"}}),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn load_missing_user_is_none() {
        let store = test_store().await;
        assert!(store.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_load() {
        let store = test_store().await;
        let record = sample_record();
        store.save("user1", &record).await.unwrap();

        let loaded = store.load("user1").await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn save_overwrites() {
        let store = test_store().await;
        store.save("user1", &sample_record()).await.unwrap();

        let mut updated = sample_record();
        updated.current_step = Some("activity:running:style".into());
        updated.registration_completed_at = Some(Utc::now());
        store.save("user1", &updated).await.unwrap();

        let loaded = store.load("user1").await.unwrap().unwrap();
        assert_eq!(loaded.current_step.as_deref(), Some("activity:running:style"));
        assert!(loaded.is_registered());
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = test_store().await;
        store.save("user1", &sample_record()).await.unwrap();
        store.save("user2", &ProgressRecord::default()).await.unwrap();

        let u1 = store.load("user1").await.unwrap().unwrap();
        let u2 = store.load("user2").await.unwrap().unwrap();
        assert_eq!(u1.selected_activities.len(), 2);
        assert!(u2.current_step.is_none());
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = test_store().await;
        store.save("user1", &sample_record()).await.unwrap();
        assert!(store.delete("user1").await.unwrap());
        assert!(!store.delete("user1").await.unwrap());
        assert!(store.load("user1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_row_is_reported() {
        let store = test_store().await;
        store
            .conn
            .execute(
                "INSERT INTO onboarding_progress (user_id, record) VALUES ('broken', 'not json')",
                (),
            )
            .await
            .unwrap();

        match store.load("broken").await {
            Err(StoreError::Corrupt { user_id, .. }) => assert_eq!(user_id, "broken"),
            other => panic!("expected corrupt error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mirrored_columns_follow_record() {
        let store = test_store().await;
        store.save("user1", &sample_record()).await.unwrap();

        let mut rows = store
            .conn
            .query(
                "SELECT current_step FROM onboarding_progress WHERE user_id = 'user1'",
                (),
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let step: String = row.get(0).unwrap();
        assert_eq!(step, "preferred_days");
    }

    #[tokio::test]
    async fn local_file_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("onboarding.db");

        {
            let store = LibSqlProfileStore::new_local(&path).await.unwrap();
            store.save("user1", &sample_record()).await.unwrap();
        }

        let reopened = LibSqlProfileStore::new_local(&path).await.unwrap();
        let loaded = reopened.load("user1").await.unwrap().unwrap();
        assert_eq!(loaded, sample_record());
    }
}
