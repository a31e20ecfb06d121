//! Phrase-battery scam scorer.
//!
//! Every matcher is a case-insensitive regex with a fixed weight and the
//! signals it raises. Scoring is a total function over text: the worst case is
//! an empty indicator bundle.

use once_cell::sync::Lazy;
use regex::Regex;

use super::indicators::{ScamIndicators, ScamSignal};

/// One entry in the scoring battery.
#[derive(Debug)]
pub struct PhraseMatcher {
    pub name: &'static str,
    pub weight: u32,
    pub signals: &'static [ScamSignal],
    pattern: Regex,
}

impl PhraseMatcher {
    fn new(
        name: &'static str,
        pattern: &str,
        weight: u32,
        signals: &'static [ScamSignal],
    ) -> Self {
        Self {
            name,
            weight,
            signals,
            pattern: Regex::new(pattern).expect("scoring pattern must compile"),
        }
    }

    /// First matched substring, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

use ScamSignal::*;

static BATTERY: Lazy<Vec<PhraseMatcher>> = Lazy::new(|| {
    vec![
        PhraseMatcher::new(
            "urgency",
            r"(?i)\b(urgent|immediately|right\s*now|today|within\s*[0-9]+\s*(minutes?|hours?)|final\s*warning)\b",
            40,
            &[Urgency],
        ),
        PhraseMatcher::new(
            "account_threat",
            r"(?i)\b(account|upi|bank).*(blocked|suspended|disabled|closed|frozen)\b",
            40,
            &[Threat],
        ),
        PhraseMatcher::new(
            "verification",
            r"(?i)\b(verify|verification|kyc|re-?activate|update\s*kyc)\b",
            20,
            &[FinancialRequest],
        ),
        PhraseMatcher::new(
            "payment",
            r"(?i)\b(pay|payment|transfer|send|deposit)\b",
            25,
            &[FinancialRequest],
        ),
        PhraseMatcher::new(
            "credential",
            r"(?i)\b(otp|one\s*time\s*password|pin|cvv|password)\b",
            35,
            &[CredentialRequest],
        ),
        PhraseMatcher::new(
            "impersonation",
            r"(?i)\b(bank|sbi|hdfc|icici|axis|rbi|customer\s*care|support\s*team)\b",
            15,
            &[Impersonation],
        ),
        PhraseMatcher::new(
            "call_to_action",
            r"(?i)\b(click|tap|call|dial|visit|open\s*link|contact|reply|download)\b",
            15,
            &[],
        ),
        PhraseMatcher::new(
            "lottery",
            r"(?i)\b(prize|lottery|winner|won|congratulations|reward|cashback|refund|bonus|gift)\b",
            30,
            &[LotteryBait, FinancialRequest],
        ),
        PhraseMatcher::new(
            "tech_support",
            r"(?i)\b(virus|malware|hacked|compromised|remote\s*access|technical\s*support|install\s*software)\b",
            25,
            &[TechSupportBait],
        ),
        PhraseMatcher::new(
            "government_threat",
            r"(?i)\b(police|cbi|enforcement|income\s*tax|court|arrest|warrant|legal\s*action|government\s*official)\b",
            35,
            &[GovernmentThreat, Threat],
        ),
        PhraseMatcher::new(
            "delivery",
            r"(?i)\b(parcel|package|customs|courier|shipment|detained|delivery\s*fee)\b",
            20,
            &[FinancialRequest],
        ),
        PhraseMatcher::new(
            "job_investment",
            r"(?i)\b(job\s*offer|work\s*from\s*home|part[\s\-]time|earn\s*money|investment\s*return|profit\s*guarantee|easy\s*income)\b",
            20,
            &[],
        ),
    ]
});

/// A named conjunction over indicator flags and score.
#[derive(Debug)]
pub struct DetectionRule {
    pub name: &'static str,
    applies: fn(&ScamIndicators) -> bool,
}

impl DetectionRule {
    /// Evaluates the rule.
    pub fn applies(&self, indicators: &ScamIndicators) -> bool {
        (self.applies)(indicators)
    }
}

/// Independent OR-ed rules; order only decides which one is reported.
pub static DETECTION_RULES: [DetectionRule; 9] = [
    DetectionRule {
        name: "pressure_with_ask",
        applies: |i| i.has_pressure() && i.has_ask() && i.score >= 40,
    },
    DetectionRule {
        name: "impersonation_credential",
        applies: |i| i.impersonation && i.credential_request && i.score >= 30,
    },
    DetectionRule {
        name: "impersonation_financial",
        applies: |i| i.impersonation && i.financial_request && i.score >= 35,
    },
    DetectionRule {
        name: "impersonation_pressure",
        applies: |i| i.impersonation && i.has_pressure() && i.score >= 40,
    },
    DetectionRule {
        name: "high_score",
        applies: |i| i.score >= 60,
    },
    DetectionRule {
        name: "financial_credential",
        applies: |i| i.financial_request && i.credential_request && i.score >= 40,
    },
    DetectionRule {
        name: "lottery_financial",
        applies: |i| i.lottery_bait && i.financial_request,
    },
    DetectionRule {
        name: "government_threat",
        applies: |i| i.government_threat && i.score >= 35,
    },
    DetectionRule {
        name: "tech_support",
        applies: |i| i.tech_support_bait && (i.urgency || i.score >= 40),
    },
];

/// Stateless scorer over the fixed phrase battery.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScamScorer;

impl ScamScorer {
    /// Creates a scorer.
    pub fn new() -> Self {
        Self
    }

    /// Scores one message.
    pub fn score(&self, text: &str) -> ScamIndicators {
        let mut indicators = ScamIndicators::default();
        for matcher in BATTERY.iter() {
            if let Some(phrase) = matcher.find(text) {
                indicators.score += matcher.weight;
                indicators.matched_phrases.push(phrase.to_string());
                for signal in matcher.signals {
                    indicators.raise(*signal);
                }
            }
        }
        indicators
    }

    /// Returns true if any detection rule applies.
    pub fn is_scam(&self, indicators: &ScamIndicators) -> bool {
        self.matching_rule(indicators).is_some()
    }

    /// First detection rule that applies, for logging.
    pub fn matching_rule(&self, indicators: &ScamIndicators) -> Option<&'static DetectionRule> {
        DETECTION_RULES.iter().find(|rule| rule.applies(indicators))
    }

    /// The matchers in evaluation order.
    pub fn battery(&self) -> &'static [PhraseMatcher] {
        BATTERY.as_slice()
    }
}
