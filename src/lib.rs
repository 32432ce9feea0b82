//! Fit Onboarding — resumable onboarding flow for the fitness app.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
