//! Onboarding step tokens and the fixed backbone order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::items::{ItemFlow, ItemKind};
use crate::error::FlowError;

/// Marker screen name recorded once an item's detail flow is fully submitted.
pub const COMPLETED_MARKER: &str = "completed";

/// Backbone steps of the onboarding flow.
///
/// Progresses linearly: CoreProfile → PhysicalInfo → Location → Preferences →
/// Schedule → PreferredDays → [activities] → AnythingElse → [goals] →
/// Summary → Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CoreProfile,
    PhysicalInfo,
    Location,
    Preferences,
    Schedule,
    PreferredDays,
    AnythingElse,
    Summary,
    Complete,
}

/// What follows a backbone step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearNext {
    Step(Step),
    BranchToActivities,
    BranchToGoals,
    Terminal,
}

impl Step {
    /// Where a fresh user starts.
    pub const FIRST: Step = Step::CoreProfile;

    /// Every backbone step, in order.
    pub const ALL: [Step; 9] = [
        Step::CoreProfile,
        Step::PhysicalInfo,
        Step::Location,
        Step::Preferences,
        Step::Schedule,
        Step::PreferredDays,
        Step::AnythingElse,
        Step::Summary,
        Step::Complete,
    ];

    /// The step immediately after `self` in the backbone.
    pub fn next_linear(&self) -> LinearNext {
        use Step::*;
        match self {
            CoreProfile => LinearNext::Step(PhysicalInfo),
            PhysicalInfo => LinearNext::Step(Location),
            Location => LinearNext::Step(Preferences),
            Preferences => LinearNext::Step(Schedule),
            Schedule => LinearNext::Step(PreferredDays),
            PreferredDays => LinearNext::BranchToActivities,
            AnythingElse => LinearNext::BranchToGoals,
            Summary => LinearNext::Step(Complete),
            Complete => LinearNext::Terminal,
        }
    }

    /// Whether this step ends onboarding.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoreProfile => "core_profile",
            Self::PhysicalInfo => "physical_info",
            Self::Location => "location",
            Self::Preferences => "preferences",
            Self::Schedule => "schedule",
            Self::PreferredDays => "preferred_days",
            Self::AnythingElse => "anything_else",
            Self::Summary => "summary",
            Self::Complete => "complete",
        }
    }
}

impl LinearNext {
    /// The backbone step a checklist branch falls through to once exhausted.
    pub fn branch_exit(kind: ItemKind) -> Step {
        match kind {
            ItemKind::Activity => Step::AnythingElse,
            ItemKind::Goal => Step::Summary,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Step {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| FlowError::UnknownStep(s.to_string()))
    }
}

/// A parsed `current_step` value.
///
/// Item tokens are `<kind>:<item>:<screen>` for a detail screen and
/// `<kind>:<item>:completed` once the whole item is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepToken {
    Backbone(Step),
    ItemScreen {
        kind: ItemKind,
        flow: &'static ItemFlow,
        screen: &'static str,
    },
    ItemCompleted {
        kind: ItemKind,
        flow: &'static ItemFlow,
    },
}

impl StepToken {
    /// Token for one of an item's detail screens.
    pub fn item_screen(kind: ItemKind, item: &str, screen: &str) -> Result<Self, FlowError> {
        let flow = kind.flow(item).ok_or_else(|| FlowError::UnknownItem {
            kind,
            item: item.to_string(),
        })?;
        let screen = flow
            .screens
            .iter()
            .copied()
            .find(|s| *s == screen)
            .ok_or_else(|| FlowError::UnknownStep(format!("{kind}:{item}:{screen}")))?;
        Ok(Self::ItemScreen { kind, flow, screen })
    }

    /// Completed marker for an item.
    pub fn item_completed(kind: ItemKind, item: &str) -> Result<Self, FlowError> {
        let flow = kind.flow(item).ok_or_else(|| FlowError::UnknownItem {
            kind,
            item: item.to_string(),
        })?;
        Ok(Self::ItemCompleted { kind, flow })
    }

    /// The checklist this token belongs to, if it is an item token.
    pub fn item_kind(&self) -> Option<ItemKind> {
        match self {
            Self::Backbone(_) => None,
            Self::ItemScreen { kind, .. } | Self::ItemCompleted { kind, .. } => Some(*kind),
        }
    }
}

impl std::fmt::Display for StepToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backbone(step) => write!(f, "{step}"),
            Self::ItemScreen { kind, flow, screen } => write!(f, "{kind}:{}:{screen}", flow.item),
            Self::ItemCompleted { kind, flow } => {
                write!(f, "{kind}:{}:{COMPLETED_MARKER}", flow.item)
            }
        }
    }
}

impl FromStr for StepToken {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || FlowError::UnknownStep(s.to_string());

        let mut parts = s.splitn(3, ':');
        let head = parts.next().unwrap_or_default();
        let (Some(item), Some(screen)) = (parts.next(), parts.next()) else {
            return s.parse::<Step>().map(Self::Backbone);
        };

        let kind = ItemKind::from_prefix(head).ok_or_else(unknown)?;
        let flow = kind.flow(item).ok_or_else(unknown)?;
        if screen == COMPLETED_MARKER {
            return Ok(Self::ItemCompleted { kind, flow });
        }
        let screen = flow
            .screens
            .iter()
            .copied()
            .find(|candidate| *candidate == screen)
            .ok_or_else(unknown)?;
        Ok(Self::ItemScreen { kind, flow, screen })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_linear_walks_backbone() {
        use Step::*;
        assert_eq!(CoreProfile.next_linear(), LinearNext::Step(PhysicalInfo));
        assert_eq!(PhysicalInfo.next_linear(), LinearNext::Step(Location));
        assert_eq!(Location.next_linear(), LinearNext::Step(Preferences));
        assert_eq!(Preferences.next_linear(), LinearNext::Step(Schedule));
        assert_eq!(Schedule.next_linear(), LinearNext::Step(PreferredDays));
        assert_eq!(PreferredDays.next_linear(), LinearNext::BranchToActivities);
        assert_eq!(AnythingElse.next_linear(), LinearNext::BranchToGoals);
        assert_eq!(Summary.next_linear(), LinearNext::Step(Complete));
        assert_eq!(Complete.next_linear(), LinearNext::Terminal);
    }

    #[test]
    fn branch_exits() {
        assert_eq!(LinearNext::branch_exit(ItemKind::Activity), Step::AnythingElse);
        assert_eq!(LinearNext::branch_exit(ItemKind::Goal), Step::Summary);
    }

    #[test]
    fn is_terminal() {
        assert!(Step::Complete.is_terminal());
        assert!(!Step::Summary.is_terminal());
        assert!(!Step::FIRST.is_terminal());
    }

    #[test]
    fn display_matches_serde() {
        for step in Step::ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json, "mismatch for {step:?}");
            assert_eq!(step.as_str().parse::<Step>().unwrap(), step);
        }
    }

    #[test]
    fn unknown_step_is_an_error() {
        assert_eq!(
            "physical_stats".parse::<Step>(),
            Err(FlowError::UnknownStep("physical_stats".into()))
        );
        assert!("".parse::<StepToken>().is_err());
        assert!("CoreProfile".parse::<StepToken>().is_err());
    }

    #[test]
    fn parses_item_tokens() {
        let token: StepToken = "activity:running:style".parse().unwrap();
        match token {
            StepToken::ItemScreen { kind, flow, screen } => {
                assert_eq!(kind, ItemKind::Activity);
                assert_eq!(flow.item, "running");
                assert_eq!(screen, "style");
            }
            other => panic!("unexpected token {other:?}"),
        }

        let done: StepToken = "goal:get-faster:completed".parse().unwrap();
        assert!(matches!(done, StepToken::ItemCompleted { kind: ItemKind::Goal, .. }));
        assert_eq!(done.item_kind(), Some(ItemKind::Goal));
    }

    #[test]
    fn rejects_malformed_item_tokens() {
        for bad in [
            "activity:yoga:completed",
            "activity:running:stroke",
            "workout:running:style",
            "activity:running",
            "goal:get-faster:",
        ] {
            assert_eq!(
                bad.parse::<StepToken>(),
                Err(FlowError::UnknownStep(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn token_display_roundtrips() {
        for raw in [
            "preferred_days",
            "activity:strength-training:experience",
            "activity:hiking:completed",
            "goal:lose-weight:target-weight",
        ] {
            let token: StepToken = raw.parse().unwrap();
            assert_eq!(token.to_string(), raw);
        }
    }

    #[test]
    fn constructors_validate() {
        assert!(StepToken::item_screen(ItemKind::Activity, "running", "example").is_ok());
        assert_eq!(
            StepToken::item_completed(ItemKind::Activity, "yoga"),
            Err(FlowError::UnknownItem {
                kind: ItemKind::Activity,
                item: "yoga".into()
            })
        );
        assert!(matches!(
            StepToken::item_screen(ItemKind::Goal, "get-faster", "style"),
            Err(FlowError::UnknownStep(_))
        ));
    }
}
