//! Category allowlist - the vocabulary the model may suggest from
//!
//! One allowlist instance is built per extraction request and used twice:
//! embedded in the prompt, then enforced during reconciliation. Keeping both
//! uses on the same instance means the model is never instructed against a
//! vocabulary the reconciler won't accept.

use std::collections::HashSet;

/// Category assigned when the model's suggestion is not in the allowlist
pub const FALLBACK_CATEGORY: &str = "Other";

/// Default vocabulary used when the registry has no active categories yet
const SEED_CATEGORIES: [&str; 7] = [
    "Travel",
    "Meals",
    "Transport",
    "Accommodation",
    "Supplies",
    "Software",
    "Other",
];

/// An ordered set of unique, non-empty category names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAllowlist {
    names: Vec<String>,
}

impl CategoryAllowlist {
    /// Build an allowlist from raw registry names
    ///
    /// Names are trimmed; empty names are dropped; duplicates keep their
    /// first position. The result may be empty if every input was blank.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for name in names {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed.to_string()) {
                kept.push(trimmed.to_string());
            }
        }
        Self { names: kept }
    }

    /// The seed vocabulary used before any categories are registered
    pub fn default_vocabulary() -> Self {
        Self::from_names(SEED_CATEGORIES)
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Comma-joined rendering for prompt embedding
    pub fn to_prompt_list(&self) -> String {
        self.names.join(", ")
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no names survived construction
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order_and_dedupes() {
        let list = CategoryAllowlist::from_names(["Travel", "Meals", "Travel", "Software"]);
        assert_eq!(list.names(), ["Travel", "Meals", "Software"]);
    }

    #[test]
    fn test_drops_blank_names() {
        let list = CategoryAllowlist::from_names(["  ", "Meals", ""]);
        assert_eq!(list.names(), ["Meals"]);
    }

    #[test]
    fn test_trims_names() {
        let list = CategoryAllowlist::from_names(["  Travel  "]);
        assert!(list.contains("Travel"));
        assert!(!list.contains("  Travel  "));
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let list = CategoryAllowlist::from_names(["Travel"]);
        assert!(list.contains("Travel"));
        assert!(!list.contains("travel"));
        assert!(!list.contains("TRAVEL"));
    }

    #[test]
    fn test_default_vocabulary_includes_fallback() {
        let seed = CategoryAllowlist::default_vocabulary();
        assert!(!seed.is_empty());
        assert!(seed.contains(FALLBACK_CATEGORY));
    }

    #[test]
    fn test_prompt_list_rendering() {
        let list = CategoryAllowlist::from_names(["Travel", "Other"]);
        assert_eq!(list.to_prompt_list(), "Travel, Other");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: construction always yields unique, non-empty names
        #[test]
        fn test_unique_nonempty_names(input: Vec<String>) {
            let list = CategoryAllowlist::from_names(input.iter());
            let mut seen = std::collections::HashSet::new();
            for name in list.names() {
                prop_assert!(!name.trim().is_empty());
                prop_assert!(seen.insert(name.clone()), "duplicate name {}", name);
            }
        }

        /// Property: every kept name passes the membership test
        #[test]
        fn test_kept_names_are_members(input: Vec<String>) {
            let list = CategoryAllowlist::from_names(input.iter());
            for name in list.names() {
                prop_assert!(list.contains(name));
            }
        }
    }
}
