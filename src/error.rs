//! Error types for the onboarding service.

use crate::onboarding::items::ItemKind;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Profile store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or the query failed. Callers retry the
    /// load instead of guessing a record.
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),

    #[error("Progress record for user {user_id} is corrupt: {reason}")]
    Corrupt { user_id: String, reason: String },

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Errors raised while resolving or mutating onboarding state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The record references a step outside the closed set.
    #[error("Unknown onboarding step token: {0:?}")]
    UnknownStep(String),

    #[error("{kind} {item:?} has no detail screens")]
    UnknownItem { kind: ItemKind, item: String },

    #[error("{kind} {item:?} was never selected")]
    ItemNotSelected { kind: ItemKind, item: String },
}

impl FlowError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownStep(_) => "unknown_step",
            Self::UnknownItem { .. } => "unknown_item",
            Self::ItemNotSelected { .. } => "item_not_selected",
        }
    }
}
