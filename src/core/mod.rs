// Core algorithm exports
pub mod catalog;
pub mod controller;
pub mod disclosure;
pub mod engagement;
pub mod error;
pub mod filters;

pub use catalog::ProfileCatalog;
pub use controller::{MatchController, MatchReceipt, QuotaPolicy, SessionState};
pub use disclosure::{present, present_all};
pub use engagement::{EngagementTrigger, TriggerMode, TriggerPolicy};
pub use error::CoreError;
pub use filters::{filter, matches_criteria};
