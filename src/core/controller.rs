use std::collections::BTreeMap;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::core::{
    catalog::ProfileCatalog,
    disclosure::{present, present_all},
    engagement::{EngagementTrigger, TriggerPolicy},
    filters::filter,
    CoreError,
};
use crate::models::{
    DisclosedProfile, FilterCriteria, MatchOutcome, MatchRecord, ProfileId, QuotaState, RemainingFree,
    ScrollSignal, Tier,
};

/// Quota constants shared by every session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    pub free_requests_limit: u32,
    pub paid_match_fee_cents: u32,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            free_requests_limit: 3,
            paid_match_fee_cents: 500,
        }
    }
}

/// All mutable state of one browsing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub matches: BTreeMap<ProfileId, MatchRecord>,
    pub quota: QuotaState,
    pub engagement: EngagementTrigger,
}

impl SessionState {
    pub fn new(tier: Tier, free_requests_limit: u32, trigger: TriggerPolicy) -> Self {
        Self {
            matches: BTreeMap::new(),
            quota: QuotaState::new(tier, free_requests_limit),
            engagement: EngagementTrigger::new(trigger),
        }
    }
}

/// Everything the UI and billing need after a match request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReceipt {
    pub profile_id: ProfileId,
    pub outcome: MatchOutcome,
    pub remaining_free: RemainingFree,
    /// Fee owed out-of-band; only set for `ConfirmedPaid`
    pub fee_cents: Option<u32>,
    pub message: String,
}

/// Owns the match set, the quota and the engagement latch of one session
///
/// Every mutation goes through `&mut self`, so a controller shared between
/// requests has to sit behind a lock, which also makes the quota check and
/// increment in [`MatchController::request_match`] a single step.
#[derive(Debug, Clone)]
pub struct MatchController {
    catalog: Arc<ProfileCatalog>,
    state: SessionState,
    paid_match_fee_cents: u32,
}

impl MatchController {
    pub fn new(
        catalog: Arc<ProfileCatalog>,
        tier: Tier,
        policy: &QuotaPolicy,
        trigger: TriggerPolicy,
    ) -> Self {
        Self {
            catalog,
            state: SessionState::new(tier, policy.free_requests_limit, trigger),
            paid_match_fee_cents: policy.paid_match_fee_cents,
        }
    }

    /// Build a controller around existing state
    pub fn with_state(catalog: Arc<ProfileCatalog>, state: SessionState, paid_match_fee_cents: u32) -> Self {
        Self {
            catalog,
            state,
            paid_match_fee_cents,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn is_matched(&self, id: ProfileId) -> bool {
        self.state.matches.contains_key(&id)
    }

    pub fn remaining_free(&self) -> RemainingFree {
        let quota = &self.state.quota;
        match quota.tier {
            Tier::Premium => RemainingFree::Unlimited,
            Tier::Free => RemainingFree::Limited(
                quota.free_requests_limit.saturating_sub(quota.free_requests_used),
            ),
        }
    }

    /// Record a match with `id` and classify how it is paid for
    ///
    /// Repeated requests for the same id return `AlreadyMatched` and change
    /// nothing. An id outside the catalog is rejected without mutation.
    pub fn request_match(&mut self, id: ProfileId) -> Result<MatchOutcome, CoreError> {
        if !self.catalog.contains(id) {
            return Err(CoreError::UnknownProfileId(id));
        }

        if self.is_matched(id) {
            return Ok(MatchOutcome::AlreadyMatched);
        }

        self.state.matches.insert(
            id,
            MatchRecord {
                profile_id: id,
                matched_at: chrono::Utc::now(),
            },
        );

        let quota = &mut self.state.quota;
        let outcome = match quota.tier {
            Tier::Premium => MatchOutcome::ConfirmedFree,
            Tier::Free if quota.free_requests_used < quota.free_requests_limit => {
                quota.free_requests_used += 1;
                MatchOutcome::ConfirmedFree
            }
            Tier::Free => MatchOutcome::ConfirmedPaid,
        };

        Ok(outcome)
    }

    /// [`MatchController::request_match`] plus the feedback for the caller
    pub fn submit_match(&mut self, id: ProfileId) -> Result<MatchReceipt, CoreError> {
        let outcome = self.request_match(id)?;
        let remaining_free = self.remaining_free();

        let display_name = self
            .catalog
            .get(id)
            .map(|profile| profile.display_name.as_str())
            .unwrap_or_default();

        let fee_cents = match outcome {
            MatchOutcome::ConfirmedPaid => Some(self.paid_match_fee_cents),
            _ => None,
        };

        let message = match outcome {
            MatchOutcome::AlreadyMatched => {
                format!("You've already matched with {}!", display_name)
            }
            MatchOutcome::ConfirmedFree => match remaining_free {
                RemainingFree::Limited(left) if left > 0 => format!(
                    "Match request sent to {}! You have {} free matches remaining this month.",
                    display_name, left
                ),
                _ => format!("Match request sent to {}!", display_name),
            },
            MatchOutcome::ConfirmedPaid => format!(
                "Match request sent to {}! This match costs {} since you've used your {} free matches this month.",
                display_name,
                format_fee(self.paid_match_fee_cents),
                self.state.quota.free_requests_limit
            ),
        };

        Ok(MatchReceipt {
            profile_id: id,
            outcome,
            remaining_free,
            fee_cents,
            message,
        })
    }

    /// Match records in profile id order
    pub fn matches(&self) -> Vec<MatchRecord> {
        self.state.matches.values().cloned().collect()
    }

    /// Tier change pushed by the account system; leaves usage untouched
    pub fn set_tier(&mut self, tier: Tier) {
        self.state.quota.tier = tier;
    }

    /// Start a new billing period; matches are kept
    pub fn reset_quota_period(&mut self) {
        self.state.quota.free_requests_used = 0;
    }

    /// Feed one scroll signal to the engagement latch
    ///
    /// Returns `true` only on the call that should show the conversion surface.
    pub fn observe_scroll(&mut self, signal: &ScrollSignal) -> bool {
        self.state.engagement.evaluate(signal)
    }

    /// Filter the catalog and render each hit for this session
    pub fn browse(&self, criteria: &FilterCriteria) -> Vec<DisclosedProfile> {
        let hits = filter(self.catalog.profiles(), criteria);
        present_all(hits, |id| self.is_matched(id))
    }

    /// Render a single profile for this session
    pub fn view(&self, id: ProfileId) -> Result<DisclosedProfile, CoreError> {
        let profile = self.catalog.get(id).ok_or(CoreError::UnknownProfileId(id))?;
        Ok(present(profile, self.is_matched(id)))
    }
}

/// Render a fee in dollars, dropping zero cents
fn format_fee(cents: u32) -> String {
    if cents % 100 == 0 {
        format!("${}", cents / 100)
    } else {
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}
