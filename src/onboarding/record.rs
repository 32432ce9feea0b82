//! The persisted per-user progress record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::items::ItemKind;

/// Everything the flow resolver needs to decide what comes next.
///
/// Stored as JSON in the `onboarding_progress` table, one row per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Last successfully persisted step token. `None` for a fresh user.
    ///
    /// Kept as a raw string so an unrecognised token surfaces as a resolve
    /// error instead of making the whole record unreadable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    #[serde(default)]
    pub selected_activities: Vec<String>,
    #[serde(default)]
    pub selected_goals: Vec<String>,
    #[serde(default)]
    pub completed_activities: Vec<String>,
    #[serde(default)]
    pub completed_goals: Vec<String>,
    /// Per-step answers keyed by step token. Never read for control flow.
    #[serde(default = "empty_object")]
    pub detail_payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_completed_at: Option<DateTime<Utc>>,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            current_step: None,
            selected_activities: Vec::new(),
            selected_goals: Vec::new(),
            completed_activities: Vec::new(),
            completed_goals: Vec::new(),
            detail_payload: empty_object(),
            registration_completed_at: None,
        }
    }
}

impl ProgressRecord {
    /// Whether the user has finished onboarding.
    pub fn is_registered(&self) -> bool {
        self.registration_completed_at.is_some()
    }

    pub fn selected(&self, kind: ItemKind) -> &[String] {
        match kind {
            ItemKind::Activity => &self.selected_activities,
            ItemKind::Goal => &self.selected_goals,
        }
    }

    pub fn completed(&self, kind: ItemKind) -> &[String] {
        match kind {
            ItemKind::Activity => &self.completed_activities,
            ItemKind::Goal => &self.completed_goals,
        }
    }

    pub(crate) fn selected_mut(&mut self, kind: ItemKind) -> &mut Vec<String> {
        match kind {
            ItemKind::Activity => &mut self.selected_activities,
            ItemKind::Goal => &mut self.selected_goals,
        }
    }

    pub(crate) fn completed_mut(&mut self, kind: ItemKind) -> &mut Vec<String> {
        match kind {
            ItemKind::Activity => &mut self.completed_activities,
            ItemKind::Goal => &mut self.completed_goals,
        }
    }

    /// Completed entries that are not in the selection.
    pub fn stray_completions(&self, kind: ItemKind) -> Vec<&str> {
        let selected = self.selected(kind);
        self.completed(kind)
            .iter()
            .filter(|item| !selected.contains(*item))
            .map(String::as_str)
            .collect()
    }
}
