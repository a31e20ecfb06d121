//! Intelligence categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A kind of identifier that can be extracted from scammer messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelCategory {
    Phone,
    Upi,
    BankAccount,
    CardNumber,
    Email,
    PhishingLink,
    CaseId,
    PolicyNumber,
    OrderNumber,
    IfscCode,
}

impl IntelCategory {
    /// Number of categories.
    pub const COUNT: usize = 10;

    /// All categories in canonical order.
    pub const ALL: [IntelCategory; Self::COUNT] = [
        IntelCategory::Phone,
        IntelCategory::Upi,
        IntelCategory::BankAccount,
        IntelCategory::CardNumber,
        IntelCategory::Email,
        IntelCategory::PhishingLink,
        IntelCategory::CaseId,
        IntelCategory::PolicyNumber,
        IntelCategory::OrderNumber,
        IntelCategory::IfscCode,
    ];

    /// Categories whose absence keeps a staged engagement going.
    pub const CORE: [IntelCategory; 4] = [
        IntelCategory::Upi,
        IntelCategory::Phone,
        IntelCategory::PhishingLink,
        IntelCategory::BankAccount,
    ];

    /// Position in [`IntelCategory::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// UPI handles and emails compare without regard to case.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, IntelCategory::Upi | IntelCategory::Email)
    }

    /// Key used for de-duplication within this category.
    pub fn comparison_key(self, value: &str) -> String {
        if self.is_case_insensitive() {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }

    /// Short label used in agent notes.
    pub fn label(self) -> &'static str {
        match self {
            IntelCategory::Phone => "Phone",
            IntelCategory::Upi => "UPI",
            IntelCategory::BankAccount => "BankAcc",
            IntelCategory::CardNumber => "Card",
            IntelCategory::Email => "Email",
            IntelCategory::PhishingLink => "Links",
            IntelCategory::CaseId => "CaseID",
            IntelCategory::PolicyNumber => "Policy",
            IntelCategory::OrderNumber => "Order",
            IntelCategory::IfscCode => "IFSC",
        }
    }

    /// Snake-case name used in config keys and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            IntelCategory::Phone => "phone",
            IntelCategory::Upi => "upi",
            IntelCategory::BankAccount => "bank_account",
            IntelCategory::CardNumber => "card_number",
            IntelCategory::Email => "email",
            IntelCategory::PhishingLink => "phishing_link",
            IntelCategory::CaseId => "case_id",
            IntelCategory::PolicyNumber => "policy_number",
            IntelCategory::OrderNumber => "order_number",
            IntelCategory::IfscCode => "ifsc_code",
        }
    }

    /// Inverse of [`as_str`](Self::as_str), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for IntelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (i, category) in IntelCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn only_handles_and_emails_fold_case() {
        let folding: Vec<_> = IntelCategory::ALL
            .iter()
            .filter(|c| c.is_case_insensitive())
            .collect();
        assert_eq!(folding, vec![&IntelCategory::Upi, &IntelCategory::Email]);
        assert_eq!(IntelCategory::Upi.comparison_key("Fraud@YBL"), "fraud@ybl");
        assert_eq!(
            IntelCategory::PhishingLink.comparison_key("http://X.com"),
            "http://X.com"
        );
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(IntelCategory::from_name("UPI"), Some(IntelCategory::Upi));
        assert_eq!(
            IntelCategory::from_name(" ifsc_code "),
            Some(IntelCategory::IfscCode)
        );
        assert_eq!(IntelCategory::from_name("fax"), None);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&IntelCategory::BankAccount).unwrap();
        assert_eq!(json, "\"bank_account\"");
        assert_eq!(IntelCategory::BankAccount.to_string(), "bank_account");
    }
}
