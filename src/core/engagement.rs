use serde::{Deserialize, Serialize};
use crate::models::ScrollSignal;

/// How the scroll signal is compared against the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Bottom of the viewport as a fraction of page height
    #[default]
    Fraction,
    /// Raw scroll offset
    Offset,
}

/// Threshold configuration for the engagement trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerPolicy {
    pub mode: TriggerMode,
    pub threshold: f64,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            mode: TriggerMode::Fraction,
            threshold: 0.8,
        }
    }
}

impl TriggerPolicy {
    /// Whether a single signal crosses the threshold; ignores the latch
    pub fn is_crossed(&self, signal: &ScrollSignal) -> bool {
        match self.mode {
            TriggerMode::Fraction => {
                let finite = signal.offset.is_finite()
                    && signal.viewport_height.is_finite()
                    && signal.page_height.is_finite();
                if !finite || signal.page_height <= 0.0 {
                    return false;
                }
                signal.offset + signal.viewport_height > signal.page_height * self.threshold
            }
            TriggerMode::Offset => signal.offset.is_finite() && signal.offset > self.threshold,
        }
    }
}

/// One-shot latch deciding when to surface the conversion prompt
///
/// Fires on the first crossing signal and never again for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementTrigger {
    policy: TriggerPolicy,
    has_fired: bool,
}

impl EngagementTrigger {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            policy,
            has_fired: false,
        }
    }

    /// Evaluate one delivered signal
    ///
    /// Returns `true` exactly once: on the first crossing signal. The caller
    /// shows the conversion surface when it does.
    pub fn evaluate(&mut self, signal: &ScrollSignal) -> bool {
        if self.has_fired {
            return false;
        }

        if self.policy.is_crossed(signal) {
            self.has_fired = true;
            return true;
        }

        false
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }
}

impl Default for EngagementTrigger {
    fn default() -> Self {
        Self::new(TriggerPolicy::default())
    }
}
