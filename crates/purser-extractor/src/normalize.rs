//! Coerce raw model output into a normalized draft
//!
//! Normalization is total: whatever the model produced, the caller gets a
//! draft with every field in its documented value set. Present-but-unusable
//! values are logged before they fall back; absent values default silently.
//! The normalizer never invents corrections, so inconsistent arithmetic
//! survives into the draft and is only warned about.

use std::str::FromStr;

use chrono::NaiveDate;
use purser_domain::{Currency, NormalizedDraft, PaymentMethod, RawExtraction, TaxLabel};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

/// Normalize a raw extraction into a draft
pub fn normalize(raw: &RawExtraction) -> NormalizedDraft {
    let draft = NormalizedDraft {
        vendor: required_text(&raw.vendor),
        expense_date: coerce_date(raw.expense_date.as_deref()),
        amount_gross: coerce_amount(raw.amount_gross.as_ref(), "amount_gross"),
        tax_amount: coerce_amount(raw.tax_amount.as_ref(), "tax_amount"),
        amount_net: coerce_amount(raw.amount_net.as_ref(), "amount_net"),
        tax_rate: coerce_amount(raw.tax_rate.as_ref(), "tax_rate"),
        tax_label: coerce_enum(&raw.tax_label, "tax_label", TaxLabel::parse),
        currency: coerce_enum(&raw.currency, "currency", Currency::parse),
        document_country: required_text(&raw.document_country),
        vendor_vat_id: optional_text(&raw.vendor_vat_id),
        category_suggestion: required_text(&raw.category_suggestion),
        payment_method_guess: coerce_enum(
            &raw.payment_method_guess,
            "payment_method_guess",
            PaymentMethod::parse,
        ),
        project_code_guess: optional_text(&raw.project_code_guess),
        notes: optional_text(&raw.notes),
    };

    let gap = draft.tax_arithmetic_gap();
    if gap >= Decimal::new(1, 2) {
        warn!(
            "Draft arithmetic gap {}: net {} != gross {} - tax {}",
            gap, draft.amount_net, draft.amount_gross, draft.tax_amount
        );
    }

    draft
}

/// Free-text field that is always present on the draft, possibly empty
fn required_text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or("").to_string()
}

/// Free-text field that stays optional; whitespace-only collapses to absent
fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn coerce_enum<T: Default>(
    value: &Option<String>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    match value {
        None => T::default(),
        Some(s) => match parse(s) {
            Some(parsed) => parsed,
            None => {
                warn!("Unrecognized {} '{}', using default", field, s);
                T::default()
            }
        },
    }
}

fn coerce_amount(value: Option<&Value>, field: &str) -> Decimal {
    match value {
        None => Decimal::ZERO,
        Some(Value::Number(n)) => {
            let literal = n.to_string();
            match parse_decimal(&literal) {
                Ok(amount) => amount,
                Err(e) => {
                    warn!("Cannot represent {} {} as a decimal ({}), using 0", field, literal, e);
                    Decimal::ZERO
                }
            }
        }
        Some(Value::String(s)) => match parse_decimal(s.trim()) {
            Ok(amount) => amount,
            Err(_) => {
                warn!("Cannot parse {} '{}' as a number, using 0", field, s);
                Decimal::ZERO
            }
        },
        Some(other) => {
            warn!("Field {} is not numeric ({}), using 0", field, other);
            Decimal::ZERO
        }
    }
}

/// Parse a decimal literal, accepting scientific notation as a fallback
fn parse_decimal(literal: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(literal).or_else(|_| Decimal::from_scientific(literal))
}

fn coerce_date(value: Option<&str>) -> NaiveDate {
    let today = chrono::Local::now().date_naive();
    match value {
        None => today,
        Some(s) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                warn!("Cannot parse expense_date '{}', using today", s);
                today
            }
        },
    }
}

/// Render a draft back into the raw shape the model would produce
#[cfg(test)]
fn draft_to_raw(draft: &NormalizedDraft) -> RawExtraction {
    use serde_json::json;

    RawExtraction {
        vendor: Some(draft.vendor.clone()),
        expense_date: Some(draft.expense_date.format("%Y-%m-%d").to_string()),
        amount_gross: Some(json!(draft.amount_gross)),
        tax_amount: Some(json!(draft.tax_amount)),
        amount_net: Some(json!(draft.amount_net)),
        tax_rate: Some(json!(draft.tax_rate)),
        tax_label: Some(draft.tax_label.to_string()),
        currency: Some(draft.currency.to_string()),
        document_country: Some(draft.document_country.clone()),
        vendor_vat_id: draft.vendor_vat_id.clone(),
        category_suggestion: Some(draft.category_suggestion.clone()),
        payment_method_guess: Some(draft.payment_method_guess.to_string()),
        project_code_guess: draft.project_code_guess.clone(),
        notes: draft.notes.clone(),
    }
}
