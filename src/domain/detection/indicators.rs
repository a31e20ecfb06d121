//! Per-message scam indicators.

use serde::Serialize;

/// A category of scam behaviour raised by one or more phrase matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamSignal {
    Urgency,
    Threat,
    FinancialRequest,
    CredentialRequest,
    Impersonation,
    LotteryBait,
    TechSupportBait,
    GovernmentThreat,
}

/// Indicator bundle produced by scoring a single message.
///
/// Bundles are never merged across turns: each message is scored on its own,
/// and only the matched phrases flow into the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScamIndicators {
    pub score: u32,
    pub matched_phrases: Vec<String>,
    pub urgency: bool,
    pub threat: bool,
    pub financial_request: bool,
    pub credential_request: bool,
    pub impersonation: bool,
    pub lottery_bait: bool,
    pub tech_support_bait: bool,
    pub government_threat: bool,
}

impl ScamIndicators {
    /// Sets the flag for a signal.
    pub fn raise(&mut self, signal: ScamSignal) {
        match signal {
            ScamSignal::Urgency => self.urgency = true,
            ScamSignal::Threat => self.threat = true,
            ScamSignal::FinancialRequest => self.financial_request = true,
            ScamSignal::CredentialRequest => self.credential_request = true,
            ScamSignal::Impersonation => self.impersonation = true,
            ScamSignal::LotteryBait => self.lottery_bait = true,
            ScamSignal::TechSupportBait => self.tech_support_bait = true,
            ScamSignal::GovernmentThreat => self.government_threat = true,
        }
    }

    /// Returns true if the flag for a signal is set.
    pub fn has(&self, signal: ScamSignal) -> bool {
        match signal {
            ScamSignal::Urgency => self.urgency,
            ScamSignal::Threat => self.threat,
            ScamSignal::FinancialRequest => self.financial_request,
            ScamSignal::CredentialRequest => self.credential_request,
            ScamSignal::Impersonation => self.impersonation,
            ScamSignal::LotteryBait => self.lottery_bait,
            ScamSignal::TechSupportBait => self.tech_support_bait,
            ScamSignal::GovernmentThreat => self.government_threat,
        }
    }

    /// Urgency or threat pressure is present.
    pub fn has_pressure(&self) -> bool {
        self.urgency || self.threat
    }

    /// A money or credential ask is present.
    pub fn has_ask(&self) -> bool {
        self.financial_request || self.credential_request
    }

    /// Signals currently raised, in declaration order.
    pub fn raised_signals(&self) -> Vec<ScamSignal> {
        [
            ScamSignal::Urgency,
            ScamSignal::Threat,
            ScamSignal::FinancialRequest,
            ScamSignal::CredentialRequest,
            ScamSignal::Impersonation,
            ScamSignal::LotteryBait,
            ScamSignal::TechSupportBait,
            ScamSignal::GovernmentThreat,
        ]
        .into_iter()
        .filter(|s| self.has(*s))
        .collect()
    }
}
