//! Expense drafts - raw model output and its normalized form
//!
//! The two stages are deliberately distinct types. [`RawExtraction`] is what
//! the model said: loosely typed, internal to the pipeline, never serialized
//! to callers and never persisted. [`NormalizedDraft`] is what the core
//! produces: every field carries a guaranteed type and sits within its
//! documented value set.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tax regime label attached to an extracted amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxLabel {
    /// Value-added tax, European countries other than Spain
    Vat,
    /// Spanish value-added tax
    Iva,
    /// UK goods and services tax
    Gst,
    /// No tax applies
    #[default]
    None,
}

impl TaxLabel {
    /// Parse a label leniently: surrounding whitespace and case are ignored
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VAT" => Some(Self::Vat),
            "IVA" => Some(Self::Iva),
            "GST" => Some(Self::Gst),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }

    /// Canonical wire rendering
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vat => "VAT",
            Self::Iva => "IVA",
            Self::Gst => "GST",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for TaxLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Currencies the draft may be denominated in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro - also the default when the model gives nothing usable
    #[default]
    Eur,
    /// US dollar
    Usd,
    /// Pound sterling
    Gbp,
    /// Swiss franc
    Chf,
}

impl Currency {
    /// Parse a currency code leniently: whitespace and case are ignored
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Some(Self::Eur),
            "USD" => Some(Self::Usd),
            "GBP" => Some(Self::Gbp),
            "CHF" => Some(Self::Chf),
            _ => None,
        }
    }

    /// Canonical wire rendering
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Chf => "CHF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The model's guess at how the expense was paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Card payment
    Card,
    /// Cash payment
    Cash,
    /// Bank transfer
    Transfer,
    /// Anything else, and the default for unrecognized guesses
    #[default]
    Other,
}

impl PaymentMethod {
    /// Parse a payment method leniently: whitespace and case are ignored
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CARD" => Some(Self::Card),
            "CASH" => Some(Self::Cash),
            "TRANSFER" => Some(Self::Transfer),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }

    /// Canonical wire rendering
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "CARD",
            Self::Cash => "CASH",
            Self::Transfer => "TRANSFER",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Model output exactly as parsed, before any coercion
///
/// Text fields keep whatever string the model produced; numeric fields keep
/// the raw JSON value so the normalizer can coerce numbers, numeric strings
/// and garbage uniformly. Absence and null are equivalent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExtraction {
    /// Merchant name as printed on the document
    pub vendor: Option<String>,
    /// Document date, expected `YYYY-MM-DD` but not trusted
    pub expense_date: Option<String>,
    /// Total including tax
    pub amount_gross: Option<Value>,
    /// Tax portion of the total
    pub tax_amount: Option<Value>,
    /// Total excluding tax
    pub amount_net: Option<Value>,
    /// Tax rate in percent
    pub tax_rate: Option<Value>,
    /// Tax regime label
    pub tax_label: Option<String>,
    /// Currency code
    pub currency: Option<String>,
    /// ISO country the document was issued in
    pub document_country: Option<String>,
    /// Vendor tax identifier if printed
    pub vendor_vat_id: Option<String>,
    /// Category the model picked from the allowlist
    pub category_suggestion: Option<String>,
    /// Payment method guess
    pub payment_method_guess: Option<String>,
    /// Project code if the document mentions one
    pub project_code_guess: Option<String>,
    /// Free-text remarks
    pub notes: Option<String>,
}

/// The validated expense draft the core hands to its caller
///
/// Every field has a guaranteed type; optional fields are omitted from the
/// wire form when absent. Amounts use fixed-precision decimals and serialize
/// as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDraft {
    /// Merchant name, trimmed free text (may be empty)
    pub vendor: String,

    /// Document date; defaults to today when the model's date was unusable
    pub expense_date: NaiveDate,

    /// Total including tax
    pub amount_gross: Decimal,

    /// Tax portion of the total
    pub tax_amount: Decimal,

    /// Total excluding tax
    pub amount_net: Decimal,

    /// Tax rate in percent
    pub tax_rate: Decimal,

    /// Tax regime label
    pub tax_label: TaxLabel,

    /// Draft currency
    pub currency: Currency,

    /// Issuing country, trimmed free text (may be empty)
    pub document_country: String,

    /// Vendor tax identifier if the document printed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_vat_id: Option<String>,

    /// Category after reconciliation against the allowlist
    pub category_suggestion: String,

    /// Payment method guess
    pub payment_method_guess: PaymentMethod,

    /// Project code if the document mentioned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_code_guess: Option<String>,

    /// Free-text remarks, including any preserved original suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NormalizedDraft {
    /// Absolute difference between `amount_net` and `amount_gross - tax_amount`
    ///
    /// The pipeline never corrects a gap; it reports drafts as the model
    /// stated them and leaves arithmetic disputes to human review.
    pub fn tax_arithmetic_gap(&self) -> Decimal {
        (self.amount_net - (self.amount_gross - self.tax_amount)).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_draft() -> NormalizedDraft {
        NormalizedDraft {
            vendor: "Cafe Sol".to_string(),
            expense_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            amount_gross: dec("12.50"),
            tax_amount: dec("1.09"),
            amount_net: dec("11.41"),
            tax_rate: dec("9.5"),
            tax_label: TaxLabel::Iva,
            currency: Currency::Eur,
            document_country: "ES".to_string(),
            vendor_vat_id: None,
            category_suggestion: "Meals".to_string(),
            payment_method_guess: PaymentMethod::Card,
            project_code_guess: None,
            notes: None,
        }
    }

    #[test]
    fn test_enum_parsing_is_lenient() {
        assert_eq!(TaxLabel::parse(" iva "), Some(TaxLabel::Iva));
        assert_eq!(TaxLabel::parse("VAT"), Some(TaxLabel::Vat));
        assert_eq!(TaxLabel::parse("sales tax"), None);
        assert_eq!(Currency::parse("eur"), Some(Currency::Eur));
        assert_eq!(Currency::parse("JPY"), None);
        assert_eq!(PaymentMethod::parse("card\n"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("bitcoin"), None);
    }

    #[test]
    fn test_enum_defaults_match_normalization_rules() {
        assert_eq!(TaxLabel::default(), TaxLabel::None);
        assert_eq!(Currency::default(), Currency::Eur);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Other);
    }

    #[test]
    fn test_draft_wire_shape() {
        let value = serde_json::to_value(sample_draft()).unwrap();
        assert_eq!(value["vendor"], "Cafe Sol");
        assert_eq!(value["expense_date"], "2024-03-02");
        assert_eq!(value["tax_label"], "IVA");
        assert_eq!(value["currency"], "EUR");
        assert_eq!(value["payment_method_guess"], "CARD");
        assert_eq!(value["amount_gross"].as_f64(), Some(12.5));
        // absent optionals are omitted, not null
        assert!(value.get("vendor_vat_id").is_none());
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_draft_round_trip() {
        let draft = sample_draft();
        let json = serde_json::to_string(&draft).unwrap();
        let back: NormalizedDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn test_arithmetic_gap_zero_when_consistent() {
        let draft = sample_draft();
        assert_eq!(draft.tax_arithmetic_gap(), dec("0"));
    }

    #[test]
    fn test_arithmetic_gap_reports_difference() {
        let mut draft = sample_draft();
        draft.amount_net = dec("11.00");
        assert_eq!(draft.tax_arithmetic_gap(), dec("0.41"));
    }
}
