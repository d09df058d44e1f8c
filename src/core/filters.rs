use std::str::FromStr;
use crate::core::CoreError;
use crate::models::{FilterCriteria, Profile};

/// Check if a profile satisfies every constraint set in the criteria
///
/// Unset constraints impose no restriction.
#[inline]
pub fn matches_criteria(profile: &Profile, criteria: &FilterCriteria) -> bool {
    // Check level
    if let Some(level) = criteria.level {
        if profile.level != level {
            return false;
        }
    }

    // Check specialty
    if let Some(specialty) = criteria.specialty {
        if profile.specialty != specialty {
            return false;
        }
    }

    // Check publications
    if criteria.require_publications && !profile.has_publications() {
        return false;
    }

    // Check institution tier
    if let Some(tier) = criteria.institution_tier {
        if profile.institution_tier != tier {
            return false;
        }
    }

    // Check region
    if let Some(region) = criteria.region {
        if profile.region != region {
            return false;
        }
    }

    true
}

/// Filter a profile sequence, preserving input order
///
/// Pure and cheap enough to run on every render.
pub fn filter<'a, I>(profiles: I, criteria: &FilterCriteria) -> Vec<&'a Profile>
where
    I: IntoIterator<Item = &'a Profile>,
{
    profiles
        .into_iter()
        .filter(|profile| matches_criteria(profile, criteria))
        .collect()
}

/// Parse one filter constraint from its display label
///
/// `None` and the empty string both mean "unset". Anything else must be a
/// member of the domain.
pub fn parse_constraint<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label
            .parse()
            .map(Some)
            .map_err(|_| CoreError::InvalidFilterValue {
                field,
                value: label.to_string(),
            }),
    }
}
