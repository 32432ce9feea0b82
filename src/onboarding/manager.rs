//! OnboardingManager — coordinates the profile store, the mutation API and
//! the flow resolver.
//!
//! Every submit follows the same order: load, mutate, save, resolve. The save
//! completes before `resolve` runs so a resumed session never re-offers work
//! that was already recorded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::checklist::ChecklistTracker;
use super::items::{ItemKind, SubNext};
use super::mutation;
use super::record::ProgressRecord;
use super::resolver::{NextScreen, resolve};
use super::step::{Step, StepToken};
use crate::error::{Error, FlowError};
use crate::store::ProfileStore;

/// A submitted backbone screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSubmission {
    pub step: Step,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<serde_json::Value>,
    /// Only read with the `preferences` step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
    /// Only read with the `preferences` step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
}

impl StepSubmission {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            answers: None,
            activities: None,
            goals: None,
        }
    }

    /// Builder: attach answers.
    pub fn with_answers(mut self, answers: serde_json::Value) -> Self {
        self.answers = Some(answers);
        self
    }

    /// Builder: attach the activity and goal selections.
    pub fn with_selections(mut self, activities: Vec<String>, goals: Vec<String>) -> Self {
        self.activities = Some(activities);
        self.goals = Some(goals);
        self
    }
}

/// A submitted item detail screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSubmission {
    pub kind: ItemKind,
    pub item: String,
    pub screen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<serde_json::Value>,
}

impl ItemSubmission {
    pub fn new(kind: ItemKind, item: impl Into<String>, screen: impl Into<String>) -> Self {
        Self {
            kind,
            item: item.into(),
            screen: screen.into(),
            answers: None,
        }
    }

    /// Builder: attach answers.
    pub fn with_answers(mut self, answers: serde_json::Value) -> Self {
        self.answers = Some(answers);
        self
    }
}

/// Onboarding status returned by the REST endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    pub onboarding_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    pub next: NextScreen,
    pub remaining_activities: Vec<&'static str>,
    pub remaining_goals: Vec<&'static str>,
}

/// Drives onboarding for any number of users against one profile store.
pub struct OnboardingManager {
    store: Arc<dyn ProfileStore>,
}

impl OnboardingManager {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Create an empty record for a newly verified user. An existing record
    /// is left alone.
    pub async fn start(&self, user_id: &str) -> Result<NextScreen, Error> {
        let record = match self.store.load(user_id).await? {
            Some(record) => record,
            None => {
                let record = ProgressRecord::default();
                self.store.save(user_id, &record).await?;
                info!(user_id, "Onboarding record created");
                record
            }
        };
        self.resolve_for(user_id, &record)
    }

    /// Where a returning user should land. Users without a record start fresh.
    pub async fn resume(&self, user_id: &str) -> Result<NextScreen, Error> {
        let record = self.load_or_fresh(user_id).await?;
        for kind in [ItemKind::Activity, ItemKind::Goal] {
            let stray = record.stray_completions(kind);
            if !stray.is_empty() {
                warn!(user_id, %kind, ?stray, "Completed items not in selection; ignoring");
            }
        }
        self.resolve_for(user_id, &record)
    }

    /// Record a submitted backbone screen and return the next screen.
    ///
    /// Submitting `summary` finishes registration.
    pub async fn submit_step(
        &self,
        user_id: &str,
        submission: StepSubmission,
    ) -> Result<NextScreen, Error> {
        let record = self.load_or_fresh(user_id).await?;
        if record.is_registered() {
            debug!(user_id, step = %submission.step, "Submit after registration ignored");
            return Ok(NextScreen::Home);
        }
        self.warn_if_unexpected(user_id, &record, StepToken::Backbone(submission.step));

        let token = StepToken::Backbone(submission.step);
        let mut next = record;
        if let Some(answers) = submission.answers {
            next = mutation::record_answers(&next, token, answers);
        }

        if submission.step == Step::Preferences {
            if let Some(activities) = &submission.activities {
                next = mutation::record_selection(&next, ItemKind::Activity, activities);
            }
            if let Some(goals) = &submission.goals {
                next = mutation::record_selection(&next, ItemKind::Goal, goals);
            }
        } else if submission.activities.is_some() || submission.goals.is_some() {
            warn!(user_id, step = %submission.step, "Selections outside preferences ignored");
        }

        next = mutation::record_step_reached(&next, token);

        if matches!(submission.step, Step::Summary | Step::Complete) {
            next = mutation::complete_registration(&next, Utc::now());
            info!(user_id, "Onboarding registration completed");
        }

        self.store.save(user_id, &next).await?;
        self.resolve_for(user_id, &next)
    }

    /// Record a submitted item detail screen and return the next screen.
    ///
    /// Submitting an item's last detail screen marks the item complete.
    pub async fn submit_item(
        &self,
        user_id: &str,
        submission: ItemSubmission,
    ) -> Result<NextScreen, Error> {
        let record = self.load_or_fresh(user_id).await?;
        if record.is_registered() {
            debug!(user_id, item = %submission.item, "Submit after registration ignored");
            return Ok(NextScreen::Home);
        }

        let ItemSubmission {
            kind,
            item,
            screen,
            answers,
        } = submission;

        let token = StepToken::item_screen(kind, &item, &screen)?;
        if !record.selected(kind).iter().any(|s| *s == item) {
            return Err(FlowError::ItemNotSelected { kind, item }.into());
        }
        self.warn_if_unexpected(user_id, &record, token);

        let mut next = record;
        if let Some(answers) = answers {
            next = mutation::record_answers(&next, token, answers);
        }

        let last_screen = match token {
            StepToken::ItemScreen { flow, screen, .. } => {
                flow.after(screen) == Some(SubNext::Exhausted)
            }
            _ => false,
        };

        next = if last_screen {
            let completed = mutation::mark_item_complete(&next, kind, &item)?;
            info!(user_id, %kind, item = %item, "Item completed");
            mutation::record_step_reached(&completed, StepToken::item_completed(kind, &item)?)
        } else {
            mutation::record_step_reached(&next, token)
        };

        self.store.save(user_id, &next).await?;
        self.resolve_for(user_id, &next)
    }

    /// Summary of a user's progress.
    pub async fn status(&self, user_id: &str) -> Result<OnboardingStatus, Error> {
        let record = self.load_or_fresh(user_id).await?;
        let next = self.resolve_for(user_id, &record)?;
        let remaining = |kind| {
            ChecklistTracker::new(kind).remaining(record.selected(kind), record.completed(kind))
        };

        Ok(OnboardingStatus {
            onboarding_completed: record.is_registered(),
            registration_completed_at: record.registration_completed_at,
            current_step: record.current_step.clone(),
            next,
            remaining_activities: remaining(ItemKind::Activity),
            remaining_goals: remaining(ItemKind::Goal),
        })
    }

    /// Drop a user's progress entirely. Returns whether a record existed.
    pub async fn reset(&self, user_id: &str) -> Result<bool, Error> {
        let existed = self.store.delete(user_id).await?;
        info!(user_id, existed, "Onboarding record reset");
        Ok(existed)
    }

    async fn load_or_fresh(&self, user_id: &str) -> Result<ProgressRecord, Error> {
        Ok(self.store.load(user_id).await?.unwrap_or_default())
    }

    fn resolve_for(&self, user_id: &str, record: &ProgressRecord) -> Result<NextScreen, Error> {
        match resolve(record) {
            Ok(next) => {
                debug!(user_id, step = ?record.current_step, %next, "Resolved next screen");
                Ok(next)
            }
            Err(e) => {
                warn!(
                    user_id,
                    step = ?record.current_step,
                    error = %e,
                    "Failed to resolve next screen"
                );
                Err(e.into())
            }
        }
    }

    /// Out-of-order submits are accepted; they are only logged.
    fn warn_if_unexpected(&self, user_id: &str, record: &ProgressRecord, submitted: StepToken) {
        if let Ok(expected) = resolve(record) {
            if expected.token() != Some(submitted) {
                warn!(user_id, %expected, %submitted, "Submitted screen differs from expected");
            }
        }
    }
}
