//! Dynamic items (activities and goals) and their detail-screen sequences.
//!
//! Only items listed here have detail screens. Anything else the user selects
//! counts as complete the moment it is selected.

use serde::{Deserialize, Serialize};

/// Which checklist an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Activity,
    Goal,
}

impl ItemKind {
    /// Token prefix used in step tokens, e.g. `activity:running:style`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Goal => "goal",
        }
    }

    /// Parse a token prefix.
    pub fn from_prefix(s: &str) -> Option<Self> {
        match s {
            "activity" => Some(Self::Activity),
            "goal" => Some(Self::Goal),
            _ => None,
        }
    }

    /// All detail flows for this kind.
    pub fn flows(&self) -> &'static [ItemFlow] {
        match self {
            Self::Activity => ACTIVITY_FLOWS,
            Self::Goal => GOAL_FLOWS,
        }
    }

    /// The detail flow for `item`, if it has one.
    pub fn flow(&self, item: &str) -> Option<&'static ItemFlow> {
        self.flows().iter().find(|f| f.item == item)
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What follows a screen inside an item's own sub-sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubNext {
    Screen(&'static str),
    Exhausted,
}

/// An item's ordered detail screens. Never empty.
#[derive(Debug, PartialEq, Eq)]
pub struct ItemFlow {
    pub item: &'static str,
    pub screens: &'static [&'static str],
}

impl ItemFlow {
    pub fn first_screen(&self) -> &'static str {
        self.screens[0]
    }

    /// The screen after `screen`, or `None` if `screen` is not part of this flow.
    pub fn after(&self, screen: &str) -> Option<SubNext> {
        let idx = self.screens.iter().position(|s| *s == screen)?;
        Some(match self.screens.get(idx + 1) {
            Some(next) => SubNext::Screen(next),
            None => SubNext::Exhausted,
        })
    }
}

static ACTIVITY_FLOWS: &[ItemFlow] = &[
    ItemFlow {
        item: "running",
        screens: &["style", "example"],
    },
    ItemFlow {
        item: "cycling",
        screens: &["style", "example"],
    },
    ItemFlow {
        item: "swimming",
        screens: &["stroke"],
    },
    ItemFlow {
        item: "strength-training",
        screens: &["experience", "example"],
    },
    ItemFlow {
        item: "hiking",
        screens: &["terrain"],
    },
];

static GOAL_FLOWS: &[ItemFlow] = &[
    ItemFlow {
        item: "get-faster",
        screens: &["current-pace", "target-pace"],
    },
    ItemFlow {
        item: "lose-weight",
        screens: &["target-weight"],
    },
    ItemFlow {
        item: "run-longer",
        screens: &["target-distance"],
    },
    ItemFlow {
        item: "build-strength",
        screens: &["focus"],
    },
];
