//! Scam type, confidence, and red-flag classification.
//!
//! All scans are substring matches over the lowercased message history and
//! accumulated keywords.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Best-effort label for the kind of fraud attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamType {
    GovtThreatFraud,
    TechSupportFraud,
    LotteryFraud,
    DeliveryFraud,
    BankFraud,
    UpiFraud,
    Phishing,
    ImpersonationFraud,
    GenericScam,
    Unknown,
}

impl ScamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamType::GovtThreatFraud => "govt_threat_fraud",
            ScamType::TechSupportFraud => "tech_support_fraud",
            ScamType::LotteryFraud => "lottery_fraud",
            ScamType::DeliveryFraud => "delivery_fraud",
            ScamType::BankFraud => "bank_fraud",
            ScamType::UpiFraud => "upi_fraud",
            ScamType::Phishing => "phishing",
            ScamType::ImpersonationFraud => "impersonation_fraud",
            ScamType::GenericScam => "generic_scam",
            ScamType::Unknown => "unknown",
        }
    }

    /// One-line description used in agent notes.
    pub fn description(&self) -> &'static str {
        match self {
            ScamType::GovtThreatFraud => "impersonates police or courts to extort payment",
            ScamType::TechSupportFraud => "claims device compromise to gain remote access",
            ScamType::LotteryFraud => "promises prizes or refunds in exchange for fees",
            ScamType::DeliveryFraud => "claims a held parcel to collect release charges",
            ScamType::BankFraud => "threatens account closure to harvest banking credentials",
            ScamType::UpiFraud => "pushes fake verification payments over UPI",
            ScamType::Phishing => "steers the victim to credential-harvesting links",
            ScamType::ImpersonationFraud => "poses as customer care or a regulator",
            ScamType::GenericScam => "shows fraud indicators without a dominant pattern",
            ScamType::Unknown => "no fraud pattern identified",
        }
    }
}

impl fmt::Display for ScamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered keyword scan; the first matching row wins.
const SCAM_TYPE_RULES: &[(ScamType, &[&str])] = &[
    (
        ScamType::GovtThreatFraud,
        &["police", "arrest", "cbi", "warrant", "court", "legal action"],
    ),
    (
        ScamType::TechSupportFraud,
        &["virus", "malware", "hacked", "remote access", "technical support"],
    ),
    (
        ScamType::LotteryFraud,
        &["prize", "lottery", "winner", "cashback", "reward", "refund"],
    ),
    (
        ScamType::DeliveryFraud,
        &["parcel", "customs", "package", "courier"],
    ),
    (
        ScamType::BankFraud,
        &["bank", "account", "blocked", "suspended", "otp"],
    ),
    (ScamType::UpiFraud, &["upi", "payment", "verify", "kyc"]),
    (ScamType::Phishing, &["click", "link"]),
    (
        ScamType::ImpersonationFraud,
        &["customer care", "support team", "rbi"],
    ),
];

/// Classifies the scam type from lowercased conversation text.
///
/// Captured phishing links count as a phishing signal even when no cue word
/// appears in the text.
pub fn classify_scam_type(corpus: &str, has_links: bool, scam_detected: bool) -> ScamType {
    for (scam_type, phrases) in SCAM_TYPE_RULES {
        let phishing_by_link = *scam_type == ScamType::Phishing && has_links;
        if phishing_by_link || phrases.iter().any(|p| corpus.contains(p)) {
            return *scam_type;
        }
    }
    if scam_detected {
        ScamType::GenericScam
    } else {
        ScamType::Unknown
    }
}

/// How sure the engine is that the session was a scam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Derives confidence from distinct red flags and captured intel items.
    pub fn assess(scam_detected: bool, red_flags: usize, intel_items: usize) -> Self {
        if !scam_detected {
            ConfidenceLevel::Low
        } else if red_flags >= 3 || intel_items >= 2 {
            ConfidenceLevel::High
        } else if red_flags >= 1 || intel_items >= 1 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// A family of phrases reported as one red flag in agent notes.
#[derive(Debug)]
pub struct RedFlagGroup {
    pub label: &'static str,
    pub phrases: &'static [&'static str],
}

pub const RED_FLAG_GROUPS: &[RedFlagGroup] = &[
    RedFlagGroup {
        label: "URGENCY PRESSURE (deadlines used to rush the victim)",
        phrases: &["urgent", "immediately", "right now", "final warning", "within"],
    },
    RedFlagGroup {
        label: "CREDENTIAL HARVESTING (asked for OTP, PIN, CVV or passwords)",
        phrases: &["otp", "password", "pin", "cvv"],
    },
    RedFlagGroup {
        label: "ACCOUNT THREAT (warned of blocking or closure)",
        phrases: &["blocked", "suspended", "closed", "frozen", "disabled"],
    },
    RedFlagGroup {
        label: "FAKE VERIFICATION (demanded KYC or re-verification)",
        phrases: &["verify", "kyc", "verification", "re-activate"],
    },
    RedFlagGroup {
        label: "PHISHING LINK (pushed the victim to open links)",
        phrases: &["click", "link", "visit"],
    },
    RedFlagGroup {
        label: "INSTITUTION IMPERSONATION (claimed to be a bank or regulator)",
        phrases: &["bank", "sbi", "hdfc", "icici", "rbi", "customer care"],
    },
    RedFlagGroup {
        label: "UNSOLICITED PAYMENT REQUEST (asked for a transfer or deposit)",
        phrases: &["payment", "transfer", "deposit", "send money"],
    },
    RedFlagGroup {
        label: "PRIZE BAIT (offered prizes, cashback or refunds)",
        phrases: &["prize", "lottery", "winner", "reward", "cashback", "refund"],
    },
    RedFlagGroup {
        label: "LEGAL INTIMIDATION (threatened arrest or court action)",
        phrases: &["police", "arrest", "court", "warrant", "cbi", "legal action"],
    },
    RedFlagGroup {
        label: "TECH SUPPORT BAIT (claimed the device was compromised)",
        phrases: &["virus", "malware", "hacked", "remote access", "technical support"],
    },
    RedFlagGroup {
        label: "DELIVERY HOLD (claimed a parcel was held for fees)",
        phrases: &["parcel", "package", "customs", "courier"],
    },
    RedFlagGroup {
        label: "JOB OR INVESTMENT BAIT (offered easy earnings)",
        phrases: &["job", "earn", "investment", "profit"],
    },
];

/// Labels of every red-flag group present in the corpus.
pub fn detect_red_flag_groups(corpus: &str, has_links: bool) -> Vec<&'static str> {
    RED_FLAG_GROUPS
        .iter()
        .filter(|group| {
            group.phrases.iter().any(|p| corpus.contains(p))
                || (has_links && group.label.starts_with("PHISHING"))
        })
        .map(|group| group.label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod scam_type {
        use super::*;

        #[test]
        fn government_threat_outranks_everything() {
            let corpus = "your bank account has a virus and police will arrest you";
            assert_eq!(classify_scam_type(corpus, true, true), ScamType::GovtThreatFraud);
        }

        #[test]
        fn lottery_outranks_bank() {
            assert_eq!(
                classify_scam_type("claim your cashback to your bank account", false, true),
                ScamType::LotteryFraud
            );
        }

        #[test]
        fn captured_link_implies_phishing() {
            assert_eq!(classify_scam_type("hello there", true, true), ScamType::Phishing);
        }

        #[test]
        fn falls_back_on_detection() {
            assert_eq!(classify_scam_type("hello there", false, true), ScamType::GenericScam);
            assert_eq!(classify_scam_type("hello there", false, false), ScamType::Unknown);
        }

        #[test]
        fn serializes_snake_case() {
            let json = serde_json::to_string(&ScamType::GovtThreatFraud).unwrap();
            assert_eq!(json, "\"govt_threat_fraud\"");
        }
    }

    mod confidence {
        use super::*;

        #[test]
        fn undetected_is_always_low() {
            assert_eq!(ConfidenceLevel::assess(false, 10, 10), ConfidenceLevel::Low);
        }

        #[test]
        fn thresholds() {
            assert_eq!(ConfidenceLevel::assess(true, 3, 0), ConfidenceLevel::High);
            assert_eq!(ConfidenceLevel::assess(true, 0, 2), ConfidenceLevel::High);
            assert_eq!(ConfidenceLevel::assess(true, 2, 1), ConfidenceLevel::Medium);
            assert_eq!(ConfidenceLevel::assess(true, 1, 0), ConfidenceLevel::Medium);
            assert_eq!(ConfidenceLevel::assess(true, 0, 0), ConfidenceLevel::Low);
        }

        #[test]
        fn serializes_lowercase() {
            assert_eq!(
                serde_json::to_string(&ConfidenceLevel::Medium).unwrap(),
                "\"medium\""
            );
        }
    }

    mod red_flags {
        use super::*;

        #[test]
        fn groups_are_reported_in_table_order() {
            let labels = detect_red_flag_groups("share otp urgent", false);
            assert_eq!(labels.len(), 2);
            assert!(labels[0].starts_with("URGENCY"));
            assert!(labels[1].starts_with("CREDENTIAL"));
        }

        #[test]
        fn link_presence_raises_phishing() {
            let labels = detect_red_flag_groups("nothing here", true);
            assert_eq!(labels.len(), 1);
            assert!(labels[0].starts_with("PHISHING"));
        }
    }
}
