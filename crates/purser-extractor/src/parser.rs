//! Parse provider output into a raw extraction
//!
//! Parsing happens in two stages. The envelope stage digs the generated text
//! out of the provider's response body; a body with no generated text means
//! the model produced nothing for this document. The payload stage parses
//! that text as JSON and lifts it field by field, tolerating missing or
//! wrong-typed values so one bad field never sinks the whole draft.

use crate::error::ExtractError;
use purser_domain::RawExtraction;
use serde_json::{Map, Value};
use tracing::warn;

/// Parse a provider response body into a raw extraction
pub fn parse_provider_payload(body: &str) -> Result<RawExtraction, ExtractError> {
    let envelope: Value = serde_json::from_str(body).map_err(|e| {
        ExtractError::MalformedOutput(format!("provider body is not JSON: {}", e))
    })?;

    let text = match candidate_text(&envelope) {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ExtractError::NoContent),
    };

    // Structured output mode should return bare JSON, but models sometimes
    // wrap it in a markdown code block anyway
    let json_str = extract_json(text)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractError::MalformedOutput(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractError::MalformedOutput("Expected JSON object".to_string()))?;

    Ok(lift_extraction(obj))
}

/// Pull the generated text out of the response envelope
fn candidate_text(envelope: &Value) -> Option<&str> {
    envelope
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Extract JSON from generated text, handling markdown code blocks
fn extract_json(text: &str) -> Result<String, ExtractError> {
    let trimmed = text.trim();

    if trimmed.starts_with("```json") || trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractError::MalformedOutput("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Lift extraction fields from the parsed object
///
/// Every field is optional here; the normalizer decides what missing values
/// become. Numeric-ish fields keep their raw JSON value because models emit
/// them as numbers on good days and as strings on bad ones.
fn lift_extraction(obj: &Map<String, Value>) -> RawExtraction {
    RawExtraction {
        vendor: string_field(obj, "vendor"),
        expense_date: string_field(obj, "expense_date"),
        amount_gross: value_field(obj, "amount_gross"),
        tax_amount: value_field(obj, "tax_amount"),
        amount_net: value_field(obj, "amount_net"),
        tax_rate: value_field(obj, "tax_rate"),
        tax_label: string_field(obj, "tax_label"),
        currency: string_field(obj, "currency"),
        document_country: string_field(obj, "document_country"),
        vendor_vat_id: string_field(obj, "vendor_vat_id"),
        category_suggestion: string_field(obj, "category_suggestion"),
        payment_method_guess: string_field(obj, "payment_method_guess"),
        project_code_guess: string_field(obj, "project_code_guess"),
        notes: string_field(obj, "notes"),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!("Field '{}' is not a string, ignoring: {}", key, other);
            None
        }
    }
}

fn value_field(obj: &Map<String, Value>, key: &str) -> Option<Value> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
    }
}
