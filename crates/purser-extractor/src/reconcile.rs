//! Reconcile the model's category suggestion against the allowlist
//!
//! Membership is exact and case-sensitive. A suggestion outside the
//! allowlist is replaced with the fallback category, and the original
//! wording is preserved in the draft's notes so a reviewer can still see
//! what the model meant.

use purser_domain::{CategoryAllowlist, NormalizedDraft, FALLBACK_CATEGORY};
use tracing::{debug, warn};

/// Force the draft's category into the allowlist
///
/// Returns `true` when the suggestion was replaced. After this call the
/// category is always a member of the allowlist or the fallback itself.
pub fn reconcile(draft: &mut NormalizedDraft, allowlist: &CategoryAllowlist) -> bool {
    if allowlist.contains(&draft.category_suggestion) {
        return false;
    }

    let original =
        std::mem::replace(&mut draft.category_suggestion, FALLBACK_CATEGORY.to_string());

    if original.is_empty() {
        debug!("No category suggestion, using fallback '{}'", FALLBACK_CATEGORY);
        return true;
    }

    warn!(
        "Category '{}' is not in the allowlist, using fallback '{}'",
        original, FALLBACK_CATEGORY
    );

    let marker = format!("[Originally suggested category: {}]", original);
    draft.notes = Some(match draft.notes.take() {
        Some(notes) => format!("{} {}", notes, marker).trim().to_string(),
        None => marker,
    });

    true
}

/// Minimal consistent draft carrying the given category suggestion
#[cfg(test)]
fn draft_with(suggestion: &str) -> NormalizedDraft {
    use chrono::NaiveDate;
    use purser_domain::{Currency, PaymentMethod, TaxLabel};
    use rust_decimal::Decimal;

    NormalizedDraft {
        vendor: "Cafe Sol".to_string(),
        expense_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        amount_gross: Decimal::new(1210, 2),
        tax_amount: Decimal::new(110, 2),
        amount_net: Decimal::new(1100, 2),
        tax_rate: Decimal::new(10, 0),
        tax_label: TaxLabel::Iva,
        currency: Currency::Eur,
        document_country: "ES".to_string(),
        vendor_vat_id: None,
        category_suggestion: suggestion.to_string(),
        payment_method_guess: PaymentMethod::Card,
        project_code_guess: None,
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist(names: &[&str]) -> CategoryAllowlist {
        CategoryAllowlist::from_names(names.iter().copied())
    }

    #[test]
    fn test_member_is_unchanged() {
        let mut draft = draft_with("Travel");
        let replaced = reconcile(&mut draft, &allowlist(&["Travel", "Meals"]));

        assert!(!replaced);
        assert_eq!(draft.category_suggestion, "Travel");
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn test_nonmember_is_replaced_with_note() {
        let mut draft = draft_with("Restaurant");
        let replaced = reconcile(&mut draft, &allowlist(&["Travel", "Other"]));

        assert!(replaced);
        assert_eq!(draft.category_suggestion, "Other");
        assert_eq!(
            draft.notes.as_deref(),
            Some("[Originally suggested category: Restaurant]")
        );
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let mut draft = draft_with("travel");
        let replaced = reconcile(&mut draft, &allowlist(&["Travel"]));

        assert!(replaced);
        assert_eq!(draft.category_suggestion, "Other");
        assert_eq!(
            draft.notes.as_deref(),
            Some("[Originally suggested category: travel]")
        );
    }

    #[test]
    fn test_existing_notes_are_kept() {
        let mut draft = draft_with("Restaurant");
        draft.notes = Some("table 4".to_string());
        reconcile(&mut draft, &allowlist(&["Travel"]));

        assert_eq!(
            draft.notes.as_deref(),
            Some("table 4 [Originally suggested category: Restaurant]")
        );
    }

    #[test]
    fn test_empty_suggestion_is_replaced_without_note() {
        let mut draft = draft_with("");
        let replaced = reconcile(&mut draft, &allowlist(&["Travel"]));

        assert!(replaced);
        assert_eq!(draft.category_suggestion, "Other");
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn test_fallback_passes_when_listed() {
        let mut draft = draft_with("Other");
        let replaced = reconcile(&mut draft, &allowlist(&["Travel", "Other"]));

        assert!(!replaced);
        assert_eq!(draft.category_suggestion, "Other");
    }

    #[test]
    fn test_final_category_is_always_in_closure() {
        let names = allowlist(&["Travel", "Meals"]);
        for suggestion in ["Travel", "Meals", "meals", "Restaurant", "", "Other"] {
            let mut draft = draft_with(suggestion);
            reconcile(&mut draft, &names);
            assert!(
                names.contains(&draft.category_suggestion)
                    || draft.category_suggestion == FALLBACK_CATEGORY,
                "category '{}' escaped the allowlist",
                draft.category_suggestion
            );
        }
    }
}
