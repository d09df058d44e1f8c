use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use crate::models::domain::{DisclosedProfile, MatchRecord, ProfileId, RemainingFree, Tier};

/// Response for the profile listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListResponse {
    pub profiles: Vec<DisclosedProfile>,
    pub total_results: usize,
}

/// Snapshot of a browsing session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: uuid::Uuid,
    pub tier: Tier,
    pub remaining_free: RemainingFree,
    pub free_requests_used: u32,
    pub free_requests_limit: u32,
    pub matched_profile_ids: Vec<ProfileId>,
    pub conversion_shown: bool,
}

/// Match records of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListResponse {
    pub matches: Vec<MatchRecord>,
}

/// Result of evaluating a scroll signal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementResponse {
    pub show_conversion: bool,
}

/// Enumerated filter domains and quota constants for building the filter bar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptionsResponse {
    pub levels: Vec<String>,
    pub specialties: Vec<String>,
    pub institution_tiers: Vec<String>,
    pub regions: Vec<String>,
    pub free_requests_limit: u32,
    pub paid_match_fee_cents: u32,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub profiles: usize,
    pub live_sessions: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
///
/// Doubles as an actix error so payload extractors can reject with it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

impl ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}
