use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::{filters::parse_constraint, CoreError};
use crate::models::domain::{FilterCriteria, ProfileId, ScrollSignal, Tier};

/// Filter selection as sent by the client
///
/// Every constraint arrives as its display label; an empty string means the
/// "All ..." option and leaves the constraint unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub level: Option<String>,
    pub specialty: Option<String>,
    pub institution_tier: Option<String>,
    pub region: Option<String>,
    #[serde(alias = "hasPublications")]
    pub require_publications: Option<bool>,
}

impl ProfileQuery {
    /// Validate every label against its domain, all-or-nothing
    pub fn to_criteria(&self) -> Result<FilterCriteria, CoreError> {
        Ok(FilterCriteria {
            level: parse_constraint("level", self.level.as_deref())?,
            specialty: parse_constraint("specialty", self.specialty.as_deref())?,
            institution_tier: parse_constraint("institutionTier", self.institution_tier.as_deref())?,
            region: parse_constraint("region", self.region.as_deref())?,
            require_publications: self.require_publications.unwrap_or(false),
        })
    }
}

/// Request to open a browsing session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub tier: Tier,
}

/// Request to match with a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(alias = "profile_id")]
    pub profile_id: ProfileId,
}

/// Tier change pushed by the account system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTierRequest {
    pub tier: Tier,
}

/// Scroll signal delivered by the client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRequest {
    #[validate(range(min = 0.0))]
    pub offset: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub viewport_height: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub page_height: f64,
}

impl From<&EngagementRequest> for ScrollSignal {
    fn from(req: &EngagementRequest) -> Self {
        ScrollSignal {
            offset: req.offset,
            viewport_height: req.viewport_height,
            page_height: req.page_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Level, Region};

    #[test]
    fn test_empty_labels_leave_constraints_unset() {
        let query = ProfileQuery {
            level: Some(String::new()),
            specialty: None,
            institution_tier: Some(String::new()),
            region: None,
            require_publications: None,
        };

        assert!(query.to_criteria().unwrap().is_unrestricted());
    }

    #[test]
    fn test_labels_parse_into_criteria() {
        let query = ProfileQuery {
            level: Some("Resident".to_string()),
            region: Some("Australia/Oceania".to_string()),
            require_publications: Some(true),
            ..Default::default()
        };

        let criteria = query.to_criteria().unwrap();
        assert_eq!(criteria.level, Some(Level::Resident));
        assert_eq!(criteria.region, Some(Region::AustraliaOceania));
        assert!(criteria.require_publications);
    }

    #[test]
    fn test_invalid_label_is_rejected() {
        let query = ProfileQuery {
            level: Some("Resident".to_string()),
            specialty: Some("Cardio".to_string()),
            ..Default::default()
        };

        match query.to_criteria() {
            Err(CoreError::InvalidFilterValue { field, value }) => {
                assert_eq!(field, "specialty");
                assert_eq!(value, "Cardio");
            }
            other => panic!("expected InvalidFilterValue, got {:?}", other),
        }
    }

    #[test]
    fn test_engagement_request_rejects_negative_offset() {
        let req = EngagementRequest {
            offset: -1.0,
            viewport_height: 800.0,
            page_height: 4000.0,
        };

        assert!(req.validate().is_err());
    }
}
