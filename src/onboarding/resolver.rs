//! Flow resolver — decides which screen a user sees next.
//!
//! Used both when an app cold-starts (resume) and after every submit. It only
//! reads the record; advancing state is the job of [`super::mutation`].

use serde::Serialize;

use super::checklist::ChecklistTracker;
use super::items::{ItemKind, SubNext};
use super::record::ProgressRecord;
use super::step::{LinearNext, Step, StepToken};
use crate::error::FlowError;

/// The screen to present next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NextScreen {
    /// A backbone screen.
    Step { step: Step },
    /// One of a selected item's detail screens.
    ItemDetail {
        kind: ItemKind,
        item: &'static str,
        screen: &'static str,
    },
    /// Onboarding is over.
    Home,
}

impl NextScreen {
    fn backbone(step: Step) -> Self {
        if step.is_terminal() {
            Self::Home
        } else {
            Self::Step { step }
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }

    /// The token a screen records once this screen is submitted.
    pub fn token(&self) -> Option<StepToken> {
        match *self {
            Self::Step { step } => Some(StepToken::Backbone(step)),
            Self::ItemDetail { kind, item, screen } => {
                StepToken::item_screen(kind, item, screen).ok()
            }
            Self::Home => None,
        }
    }
}

impl std::fmt::Display for NextScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Step { step } => write!(f, "{step}"),
            Self::ItemDetail { kind, item, screen } => write!(f, "{kind}:{item}:{screen}"),
            Self::Home => write!(f, "home"),
        }
    }
}

/// Compute the next screen for `record`.
///
/// Pure: the same record always yields the same screen.
pub fn resolve(record: &ProgressRecord) -> Result<NextScreen, FlowError> {
    if record.is_registered() {
        return Ok(NextScreen::Home);
    }

    let Some(raw) = record.current_step.as_deref() else {
        return Ok(NextScreen::backbone(Step::FIRST));
    };

    let next = match raw.parse::<StepToken>()? {
        StepToken::Backbone(step) => match step.next_linear() {
            LinearNext::Step(next) => NextScreen::backbone(next),
            LinearNext::BranchToActivities => enter_branch(record, ItemKind::Activity),
            LinearNext::BranchToGoals => enter_branch(record, ItemKind::Goal),
            LinearNext::Terminal => NextScreen::Home,
        },
        StepToken::ItemCompleted { kind, .. } => enter_branch(record, kind),
        StepToken::ItemScreen { kind, flow, screen } => {
            let in_progress = record.selected(kind).iter().any(|s| s == flow.item)
                && !record.completed(kind).iter().any(|c| c == flow.item);
            match flow.after(screen) {
                Some(SubNext::Screen(next)) if in_progress => NextScreen::ItemDetail {
                    kind,
                    item: flow.item,
                    screen: next,
                },
                _ => enter_branch(record, kind),
            }
        }
    };

    Ok(next)
}

/// Offer the next outstanding item of `kind`, or fall through to the backbone
/// step that follows the branch.
fn enter_branch(record: &ProgressRecord, kind: ItemKind) -> NextScreen {
    let tracker = ChecklistTracker::new(kind);
    match tracker.next_incomplete(record.selected(kind), record.completed(kind)) {
        Some(flow) => NextScreen::ItemDetail {
            kind,
            item: flow.item,
            screen: flow.first_screen(),
        },
        None => NextScreen::backbone(LinearNext::branch_exit(kind)),
    }
}
