//! Venuedesk Core - Shared types and rules tables.
//!
//! This crate holds everything the admin console decides without talking to
//! the outside world. It is shared by:
//! - `admin` - Admin API service (JSON + SSE)
//! - `cli` - Command-line tools for migrations and rules inspection
//!
//! # Architecture
//!
//! The core crate contains only types, static tables and pure evaluation
//! functions - no I/O, no database access, no HTTP clients. Role permission
//! sets and plan feature tables are looked up, never computed.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices
//! - [`access`] - Roles, permission tags and route requirements
//! - [`plan`] - Subscription plans, limits, feature flags and the usage gate
//! - [`notification`] - Notification records, user settings, quiet hours,
//!   the inbox and change-event routing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod notification;
pub mod plan;
pub mod types;

pub use access::{Permission, PermissionError, RoleDefinition, RoleId};
pub use plan::{FeatureValue, PlanGate, PlanTier, Resource};
pub use types::*;
