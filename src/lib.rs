//! Research Match - matching, quota and disclosure core for a researcher
//! co-author marketplace
//!
//! Users browse anonymized researcher profiles, filter them, and send match
//! requests against a monthly free quota. Full names and institutions are
//! disclosed only for matched profiles.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{filter, present, CoreError, MatchController, MatchReceipt, ProfileCatalog, QuotaPolicy};
pub use crate::models::{Profile, FilterCriteria, DisclosedProfile, MatchOutcome, RemainingFree, Tier};
