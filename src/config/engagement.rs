//! Engagement configuration
//!
//! Tunables for the conversation policy, intel retention, and reply pacing.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::engagement::{
    AskCaps, EngagementMode, PolicyConfig, DEFAULT_ASK_CAP, DEFAULT_MAX_TURNS,
    DEFAULT_RAPPORT_TURNS,
};
use crate::domain::intel::{IntelCategory, DEFAULT_INTEL_CAP};

/// Engagement configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngagementConfig {
    /// Turn at which a session completes
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// `direct` asks from the first detected turn; `staged` builds rapport first
    #[serde(default)]
    pub mode: EngagementMode,

    /// Rapport turns before asking, in staged mode
    #[serde(default = "default_rapport_turns")]
    pub rapport_turns: u32,

    /// How often each category may be asked for
    #[serde(default = "default_ask_cap")]
    pub ask_cap: u32,

    /// Per-category ask caps, e.g. `upi=2,bank_account=2`
    pub ask_cap_overrides: Option<String>,

    /// Values kept per intel category
    #[serde(default = "default_intel_cap")]
    pub intel_cap: usize,

    /// Delay before each reply, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Turn at which an interim report is sent without ending the session
    pub interim_report_turn: Option<u32>,
}

impl EngagementConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Ask caps with overrides applied.
    pub fn ask_caps(&self) -> Result<AskCaps, ValidationError> {
        let mut caps = AskCaps::uniform(self.ask_cap);
        let Some(overrides) = &self.ask_cap_overrides else {
            return Ok(caps);
        };

        for entry in overrides.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || ValidationError::InvalidAskCapOverride(entry.to_string());
            let (name, cap) = entry.split_once('=').ok_or_else(invalid)?;
            let category = IntelCategory::from_name(name).ok_or_else(invalid)?;
            let cap: u32 = cap.trim().parse().map_err(|_| invalid())?;
            caps = caps.with(category, cap);
        }
        Ok(caps)
    }

    /// Policy tunables derived from this configuration.
    pub fn policy_config(&self) -> Result<PolicyConfig, ValidationError> {
        Ok(PolicyConfig {
            max_turns: self.max_turns,
            mode: self.mode,
            rapport_turns: self.rapport_turns,
            ask_caps: self.ask_caps()?,
        })
    }

    /// Validate engagement configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_turns == 0 {
            return Err(ValidationError::InvalidMaxTurns);
        }
        if self.intel_cap == 0 {
            return Err(ValidationError::InvalidIntelCap);
        }
        self.ask_caps()?;
        Ok(())
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            mode: EngagementMode::default(),
            rapport_turns: default_rapport_turns(),
            ask_cap: default_ask_cap(),
            ask_cap_overrides: None,
            intel_cap: default_intel_cap(),
            pacing_ms: default_pacing_ms(),
            interim_report_turn: None,
        }
    }
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

fn default_rapport_turns() -> u32 {
    DEFAULT_RAPPORT_TURNS
}

fn default_ask_cap() -> u32 {
    DEFAULT_ASK_CAP
}

fn default_intel_cap() -> usize {
    DEFAULT_INTEL_CAP
}

fn default_pacing_ms() -> u64 {
    12_000
}
