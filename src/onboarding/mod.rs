//! Onboarding system — multi-screen registration flow with resume support.
//!
//! A user's progress lives in a single [`ProgressRecord`]. Screens write to it
//! through the [`mutation`] functions and then ask [`resolve`] which screen
//! comes next. Cold-start resume uses the same `resolve` call, so "where do I
//! land" and "what's after this submit" can never disagree.
//!
//! Activities and goals the user selects may have their own detail screens;
//! those are tracked by a [`ChecklistTracker`] per kind and walked in
//! selection order.

pub mod checklist;
pub mod items;
pub mod manager;
pub mod mutation;
pub mod record;
pub mod resolver;
pub mod routes;
pub mod step;

pub use checklist::ChecklistTracker;
pub use items::{ItemFlow, ItemKind};
pub use manager::{ItemSubmission, OnboardingManager, OnboardingStatus, StepSubmission};
pub use record::ProgressRecord;
pub use resolver::{NextScreen, resolve};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use step::{LinearNext, Step, StepToken};
