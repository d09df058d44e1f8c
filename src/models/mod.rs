// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Profile, ProfileId, Level, Specialty, InstitutionTier, Region, FilterCriteria, DisclosedProfile,
    MatchRecord, Tier, QuotaState, RemainingFree, MatchOutcome, ScrollSignal, UnknownLabel,
};
pub use requests::{ProfileQuery, CreateSessionRequest, MatchRequest, UpdateTierRequest, EngagementRequest};
pub use responses::{
    ProfileListResponse, SessionResponse, MatchListResponse, EngagementResponse, CatalogOptionsResponse,
    HealthResponse, ErrorResponse,
};
