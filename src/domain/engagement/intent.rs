//! Reply intents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::intel::IntelCategory;

/// What the next reply is trying to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ConfirmDetails,
    AskUpi,
    AskPhone,
    AskBank,
    AskEmail,
    AskLink,
    AskCaseId,
    AskPolicyNumber,
    AskOrderNumber,
    AskCardNumber,
    AskIfsc,
    AskIdentity,
    DeepProbe,
    Stall,
    Neutral,
}

impl Intent {
    pub const ALL: [Intent; 15] = [
        Intent::ConfirmDetails,
        Intent::AskUpi,
        Intent::AskPhone,
        Intent::AskBank,
        Intent::AskEmail,
        Intent::AskLink,
        Intent::AskCaseId,
        Intent::AskPolicyNumber,
        Intent::AskOrderNumber,
        Intent::AskCardNumber,
        Intent::AskIfsc,
        Intent::AskIdentity,
        Intent::DeepProbe,
        Intent::Stall,
        Intent::Neutral,
    ];

    /// The intent that asks for a category.
    pub fn ask_for(category: IntelCategory) -> Self {
        match category {
            IntelCategory::Upi => Intent::AskUpi,
            IntelCategory::Phone => Intent::AskPhone,
            IntelCategory::BankAccount => Intent::AskBank,
            IntelCategory::Email => Intent::AskEmail,
            IntelCategory::PhishingLink => Intent::AskLink,
            IntelCategory::CaseId => Intent::AskCaseId,
            IntelCategory::PolicyNumber => Intent::AskPolicyNumber,
            IntelCategory::OrderNumber => Intent::AskOrderNumber,
            IntelCategory::CardNumber => Intent::AskCardNumber,
            IntelCategory::IfscCode => Intent::AskIfsc,
        }
    }

    /// The category this intent solicits, for ask-X intents.
    pub fn solicits(&self) -> Option<IntelCategory> {
        match self {
            Intent::AskUpi => Some(IntelCategory::Upi),
            Intent::AskPhone => Some(IntelCategory::Phone),
            Intent::AskBank => Some(IntelCategory::BankAccount),
            Intent::AskEmail => Some(IntelCategory::Email),
            Intent::AskLink => Some(IntelCategory::PhishingLink),
            Intent::AskCaseId => Some(IntelCategory::CaseId),
            Intent::AskPolicyNumber => Some(IntelCategory::PolicyNumber),
            Intent::AskOrderNumber => Some(IntelCategory::OrderNumber),
            Intent::AskCardNumber => Some(IntelCategory::CardNumber),
            Intent::AskIfsc => Some(IntelCategory::IfscCode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ConfirmDetails => "confirm_details",
            Intent::AskUpi => "ask_upi",
            Intent::AskPhone => "ask_phone",
            Intent::AskBank => "ask_bank",
            Intent::AskEmail => "ask_email",
            Intent::AskLink => "ask_link",
            Intent::AskCaseId => "ask_case_id",
            Intent::AskPolicyNumber => "ask_policy_number",
            Intent::AskOrderNumber => "ask_order_number",
            Intent::AskCardNumber => "ask_card_number",
            Intent::AskIfsc => "ask_ifsc",
            Intent::AskIdentity => "ask_identity",
            Intent::DeepProbe => "deep_probe",
            Intent::Stall => "stall",
            Intent::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_for_and_solicits_agree() {
        for category in IntelCategory::ALL {
            assert_eq!(Intent::ask_for(category).solicits(), Some(category));
        }
    }

    #[test]
    fn fillers_solicit_nothing() {
        for intent in [
            Intent::ConfirmDetails,
            Intent::AskIdentity,
            Intent::DeepProbe,
            Intent::Stall,
            Intent::Neutral,
        ] {
            assert_eq!(intent.solicits(), None);
        }
    }

    #[test]
    fn serde_name_matches_as_str() {
        for intent in Intent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.as_str()));
        }
    }
}
