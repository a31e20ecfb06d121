//! Capped union of intelligence collections.

use super::{Intel, IntelCategory};

/// Default number of values kept per category.
pub const DEFAULT_INTEL_CAP: usize = 3;

/// Merges extractions into a session's running intel.
///
/// For each category the result is the de-duplicated concatenation of
/// `existing` then `new`, truncated to the first `cap` values. Truncation
/// keeps arrival order, so once a category is full later values are dropped.
/// With a single cap the merge is associative and `merge(x, x) == merge(x, ∅)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntelMerger {
    cap: usize,
}

impl IntelMerger {
    /// Creates a merger keeping at most `cap` values per category.
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Returns the capped union of `existing` and `new`.
    pub fn merge(&self, existing: &Intel, new: &Intel) -> Intel {
        let mut merged = Intel::new();
        for category in IntelCategory::ALL {
            for value in existing.get(category).iter().chain(new.get(category)) {
                if merged.get(category).len() >= self.cap {
                    break;
                }
                merged.push(category, value.clone());
            }
        }
        merged
    }
}

impl Default for IntelMerger {
    fn default() -> Self {
        Self::new(DEFAULT_INTEL_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn intel_of(category: IntelCategory, values: &[&str]) -> Intel {
        let mut intel = Intel::new();
        for v in values {
            intel.push(category, *v);
        }
        intel
    }

    #[test]
    fn existing_values_come_first() {
        let merger = IntelMerger::default();
        let a = intel_of(IntelCategory::Phone, &["+919000000001"]);
        let b = intel_of(IntelCategory::Phone, &["+919000000002", "+919000000001"]);
        let merged = merger.merge(&a, &b);
        assert_eq!(
            merged.get(IntelCategory::Phone),
            &["+919000000001".to_string(), "+919000000002".to_string()]
        );
    }

    #[test]
    fn full_category_drops_later_values() {
        let merger = IntelMerger::new(2);
        let a = intel_of(IntelCategory::Upi, &["a@ybl", "b@ybl"]);
        let b = intel_of(IntelCategory::Upi, &["c@ybl"]);
        let merged = merger.merge(&a, &b);
        assert_eq!(
            merged.get(IntelCategory::Upi),
            &["a@ybl".to_string(), "b@ybl".to_string()]
        );
    }

    #[test]
    fn handles_merge_case_insensitively_first_spelling_wins() {
        let merger = IntelMerger::default();
        let a = intel_of(IntelCategory::Upi, &["Fraud@YBL"]);
        let b = intel_of(IntelCategory::Upi, &["fraud@ybl"]);
        let merged = merger.merge(&a, &b);
        assert_eq!(merged.get(IntelCategory::Upi), &["Fraud@YBL".to_string()]);
    }

    #[test]
    fn oversized_input_is_truncated_even_without_new_values() {
        let merger = IntelMerger::new(1);
        let a = intel_of(IntelCategory::CaseId, &["CASE0001", "CASE0002"]);
        let merged = merger.merge(&a, &Intel::new());
        assert_eq!(merged.get(IntelCategory::CaseId).len(), 1);
    }

    #[test]
    fn differing_caps_are_order_sensitive() {
        let a = intel_of(IntelCategory::Email, &["a@x.com", "b@x.com"]);
        let b = intel_of(IntelCategory::Email, &["c@x.com"]);

        let narrow_then_wide = IntelMerger::new(3).merge(&IntelMerger::new(1).merge(&a, &b), &b);
        let wide = IntelMerger::new(3).merge(&a, &b);
        assert_ne!(narrow_then_wide, wide);
    }

    fn arb_intel() -> impl Strategy<Value = Intel> {
        prop::collection::vec((0..IntelCategory::COUNT, "[abAB]{1,2}"), 0..16).prop_map(
            |entries| {
                let mut intel = Intel::new();
                for (index, value) in entries {
                    intel.push(IntelCategory::ALL[index], value);
                }
                intel
            },
        )
    }

    fn has_duplicates(intel: &Intel) -> bool {
        IntelCategory::ALL.iter().any(|c| {
            let keys: std::collections::HashSet<_> =
                intel.get(*c).iter().map(|v| c.comparison_key(v)).collect();
            keys.len() != intel.get(*c).len()
        })
    }

    proptest! {
        #[test]
        fn merge_with_self_is_idempotent(x in arb_intel(), cap in 1usize..5) {
            let merger = IntelMerger::new(cap);
            prop_assert_eq!(merger.merge(&x, &x), merger.merge(&x, &Intel::new()));
        }

        #[test]
        fn merge_respects_cap_and_uniqueness(a in arb_intel(), b in arb_intel(), cap in 1usize..5) {
            let merged = IntelMerger::new(cap).merge(&a, &b);
            for category in IntelCategory::ALL {
                prop_assert!(merged.get(category).len() <= cap);
            }
            prop_assert!(!has_duplicates(&merged));
        }

        #[test]
        fn merge_is_associative_with_one_cap(
            a in arb_intel(),
            b in arb_intel(),
            c in arb_intel(),
            cap in 1usize..5,
        ) {
            let merger = IntelMerger::new(cap);
            let left = merger.merge(&merger.merge(&a, &b), &c);
            let right = merger.merge(&a, &merger.merge(&b, &c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn merging_a_merged_result_again_is_stable(a in arb_intel(), b in arb_intel()) {
            let merger = IntelMerger::default();
            let once = merger.merge(&a, &b);
            prop_assert_eq!(merger.merge(&once, &b), once.clone());
            prop_assert_eq!(merger.merge(&once, &once), once);
        }
    }
}
