use thiserror::Error;
use crate::models::ProfileId;

/// Errors raised at the boundary of the matching core
///
/// Every operation that returns one of these has left all state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid value '{value}' for filter '{field}'")]
    InvalidFilterValue { field: &'static str, value: String },

    #[error("Unknown profile id: {0}")]
    UnknownProfileId(ProfileId),

    #[error("Duplicate profile id in dataset: {0}")]
    DuplicateProfileId(ProfileId),
}
