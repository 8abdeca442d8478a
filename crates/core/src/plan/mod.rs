//! Subscription plans and feature gating.
//!
//! A plan is a static table of numeric limits and feature flags
//! ([`tier`], [`feature`]). [`gate`] evaluates creation and feature checks
//! for a specific user, applying the system-admin bypass.

pub mod feature;
pub mod gate;
pub mod tier;

pub use feature::{AnalyticsLevel, FEATURE_NAMES, FeatureValue};
pub use gate::{CreateDecision, PlanGate, UsageStatus};
pub use tier::{PlanDefinition, PlanFeatures, PlanLimits, PlanTier, Resource, minimum_plan_for};
