//! Extracted intelligence collection.

use super::IntelCategory;

/// Per-category ordered, de-duplicated identifier lists.
///
/// Values keep arrival order. Membership is decided by the category's
/// comparison key, so the first spelling of a case-insensitive value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intel {
    values: [Vec<String>; IntelCategory::COUNT],
}

impl Intel {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Values held for a category.
    pub fn get(&self, category: IntelCategory) -> &[String] {
        &self.values[category.index()]
    }

    /// Returns true if the category holds a value with the same comparison key.
    pub fn contains(&self, category: IntelCategory, value: &str) -> bool {
        let key = category.comparison_key(value);
        self.get(category)
            .iter()
            .any(|existing| category.comparison_key(existing) == key)
    }

    /// Appends a value unless an equivalent one is already present.
    ///
    /// Returns true if the value was added.
    pub fn push(&mut self, category: IntelCategory, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() || self.contains(category, &value) {
            return false;
        }
        self.values[category.index()].push(value);
        true
    }

    /// Returns true if nothing has been captured for the category.
    pub fn is_missing(&self, category: IntelCategory) -> bool {
        self.get(category).is_empty()
    }

    /// Returns true if no category holds a value.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Vec::is_empty)
    }

    /// Total number of values across all categories.
    pub fn total_items(&self) -> usize {
        self.values.iter().map(Vec::len).sum()
    }

    /// Non-empty categories with their values, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (IntelCategory, &[String])> {
        IntelCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
            .filter(|(_, values)| !values.is_empty())
    }

    /// Keeps at most `cap` values per category, oldest first.
    pub fn truncate(&mut self, cap: usize) {
        for values in self.values.iter_mut() {
            values.truncate(cap);
        }
    }

    /// Owned copy of a category's values.
    pub fn to_vec(&self, category: IntelCategory) -> Vec<String> {
        self.get(category).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_deduplicates_by_comparison_key() {
        let mut intel = Intel::new();
        assert!(intel.push(IntelCategory::Upi, "Fraud@ybl"));
        assert!(!intel.push(IntelCategory::Upi, "fraud@YBL"));
        assert_eq!(intel.get(IntelCategory::Upi), &["Fraud@ybl".to_string()]);
    }

    #[test]
    fn push_is_exact_for_links() {
        let mut intel = Intel::new();
        assert!(intel.push(IntelCategory::PhishingLink, "http://a.xyz/P"));
        assert!(intel.push(IntelCategory::PhishingLink, "http://a.xyz/p"));
        assert_eq!(intel.get(IntelCategory::PhishingLink).len(), 2);
    }

    #[test]
    fn push_ignores_empty_values() {
        let mut intel = Intel::new();
        assert!(!intel.push(IntelCategory::Phone, ""));
        assert!(intel.is_empty());
    }

    #[test]
    fn totals_and_iteration() {
        let mut intel = Intel::new();
        intel.push(IntelCategory::Phone, "+919876543210");
        intel.push(IntelCategory::Email, "a@b.com");
        intel.push(IntelCategory::Email, "c@d.com");

        assert_eq!(intel.total_items(), 3);
        assert!(intel.is_missing(IntelCategory::Upi));
        let categories: Vec<_> = intel.iter().map(|(c, _)| c).collect();
        assert_eq!(categories, vec![IntelCategory::Phone, IntelCategory::Email]);
    }

    #[test]
    fn truncate_keeps_oldest() {
        let mut intel = Intel::new();
        for n in ["1", "2", "3", "4"] {
            intel.push(IntelCategory::CaseId, format!("CASE00{}", n));
        }
        intel.truncate(2);
        assert_eq!(
            intel.get(IntelCategory::CaseId),
            &["CASE001".to_string(), "CASE002".to_string()]
        );
    }
}
