//! `ProfileStore` trait — the onboarding service's only persistence contract.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::onboarding::ProgressRecord;

/// Backend-agnostic storage for per-user progress records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load a user's record. `Ok(None)` means the user has no record yet and
    /// is treated as a fresh user.
    async fn load(&self, user_id: &str) -> Result<Option<ProgressRecord>, StoreError>;

    /// Insert or replace a user's record.
    async fn save(&self, user_id: &str, record: &ProgressRecord) -> Result<(), StoreError>;

    /// Remove a user's record. Returns whether one existed.
    async fn delete(&self, user_id: &str) -> Result<bool, StoreError>;
}
