use crate::models::{DisclosedProfile, Profile, ProfileId};

/// Derive the caller-visible view of a profile
///
/// Unmatched callers get the display name in place of the full name and the
/// institution tier in place of the institution. The gated values are never
/// copied into the view unless `is_matched` holds.
pub fn present(profile: &Profile, is_matched: bool) -> DisclosedProfile {
    let (name, affiliation) = if is_matched {
        (profile.full_name.clone(), profile.institution.clone())
    } else {
        (
            profile.display_name.clone(),
            profile.institution_tier.label().to_string(),
        )
    };

    DisclosedProfile {
        id: profile.id,
        name,
        display_name: profile.display_name.clone(),
        initials: initials(&profile.display_name),
        affiliation,
        institution_tier: profile.institution_tier,
        region: profile.region,
        level: profile.level,
        year: profile.year.clone(),
        specialty: profile.specialty,
        publication_count: profile.publication_count,
        verified: profile.verified,
        bio: profile.bio.clone(),
        interests: profile.interests.clone(),
        skills: profile.skills.clone(),
        previous_projects: profile.previous_projects.clone(),
        matched: is_matched,
    }
}

/// Render a sequence of profiles, asking `is_matched` for each id
pub fn present_all<'a, I, F>(profiles: I, is_matched: F) -> Vec<DisclosedProfile>
where
    I: IntoIterator<Item = &'a Profile>,
    F: Fn(ProfileId) -> bool,
{
    profiles
        .into_iter()
        .map(|profile| present(profile, is_matched(profile.id)))
        .collect()
}

/// Avatar text: first character of each word of the display name
fn initials(display_name: &str) -> String {
    display_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}
