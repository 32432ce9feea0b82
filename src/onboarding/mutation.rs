//! Mutation API — the only way onboarding state moves forward.
//!
//! Every function returns a new record and leaves the input untouched, so the
//! caller decides when the write reaches the profile store. Completion must be
//! recorded here before `resolve` is asked what comes next.

use chrono::{DateTime, Utc};

use super::checklist::ChecklistTracker;
use super::items::ItemKind;
use super::record::ProgressRecord;
use super::step::StepToken;
use crate::error::FlowError;

/// Record `token` as the last step the user reached.
pub fn record_step_reached(record: &ProgressRecord, token: StepToken) -> ProgressRecord {
    ProgressRecord {
        current_step: Some(token.to_string()),
        ..record.clone()
    }
}

/// Add `item` to the completed set for `kind`. Marking an item twice leaves
/// the record unchanged.
pub fn mark_item_complete(
    record: &ProgressRecord,
    kind: ItemKind,
    item: &str,
) -> Result<ProgressRecord, FlowError> {
    if !record.selected(kind).iter().any(|s| s == item) {
        return Err(FlowError::ItemNotSelected {
            kind,
            item: item.to_string(),
        });
    }

    let mut next = record.clone();
    ChecklistTracker::new(kind).mark_complete(next.completed_mut(kind), item);
    Ok(next)
}

/// Store the user's selection for `kind`, keeping first-seen order and
/// dropping duplicates and blanks. Completions for items no longer selected
/// are dropped with them.
pub fn record_selection(
    record: &ProgressRecord,
    kind: ItemKind,
    items: &[String],
) -> ProgressRecord {
    let mut selection: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !selection.iter().any(|s| s == item) {
            selection.push(item.to_string());
        }
    }

    let mut next = record.clone();
    next.completed_mut(kind).retain(|c| selection.contains(c));
    *next.selected_mut(kind) = selection;
    next
}

/// Store a screen's answers under its step token. Replaces any earlier answers
/// for the same token.
pub fn record_answers(
    record: &ProgressRecord,
    token: StepToken,
    answers: serde_json::Value,
) -> ProgressRecord {
    let mut next = record.clone();
    if !next.detail_payload.is_object() {
        next.detail_payload = serde_json::json!({});
    }
    if let Some(obj) = next.detail_payload.as_object_mut() {
        obj.insert(token.to_string(), answers);
    }
    next
}

/// Mark registration as finished. An existing timestamp is kept.
pub fn complete_registration(record: &ProgressRecord, at: DateTime<Utc>) -> ProgressRecord {
    ProgressRecord {
        registration_completed_at: record.registration_completed_at.or(Some(at)),
        ..record.clone()
    }
}
