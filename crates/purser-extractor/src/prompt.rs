//! Prompt engineering for document extraction
//!
//! The instructions and the response schema travel together: the schema
//! constrains what the model may emit, the instructions tell it how to fill
//! the fields in. Both embed the same category vocabulary the reconciler
//! will enforce afterwards.

use purser_domain::{DocumentRequest, FileDescriptor};
use serde_json::{json, Value};

/// Builds provider requests for expense extraction
pub struct PromptBuilder {
    categories: String,
}

impl PromptBuilder {
    /// Create a builder for the given category vocabulary
    pub fn new(allowlist: &purser_domain::CategoryAllowlist) -> Self {
        Self {
            categories: allowlist.to_prompt_list(),
        }
    }

    /// Build the complete instruction text
    pub fn build_instructions(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and vocabulary
        prompt.push_str(EXTRACTION_ROLE);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("AVAILABLE CATEGORIES: {}\n\n", self.categories));

        // 2. Expected output structure
        prompt.push_str(OUTPUT_STRUCTURE);
        prompt.push_str("\n\n");

        // 3. Extraction rules
        prompt.push_str(EXTRACTION_RULES);

        prompt
    }

    /// Build the full provider request for one document
    pub fn build_request(&self, descriptor: &FileDescriptor, content: Vec<u8>) -> DocumentRequest {
        DocumentRequest {
            instructions: self.build_instructions(),
            response_schema: response_schema(),
            mime_type: descriptor.mime_type.clone(),
            content,
        }
    }
}

/// The structured-output schema for an expense draft
///
/// Field names and enums match what the normalizer expects; `required`
/// leaves the genuinely optional fields optional.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "vendor": { "type": "string" },
            "expense_date": { "type": "string" },
            "amount_gross": { "type": "number" },
            "tax_amount": { "type": "number" },
            "amount_net": { "type": "number" },
            "tax_rate": { "type": "number" },
            "tax_label": { "type": "string", "enum": ["VAT", "IVA", "GST", "NONE"] },
            "currency": { "type": "string", "enum": ["EUR", "USD", "GBP", "CHF"] },
            "document_country": { "type": "string" },
            "vendor_vat_id": { "type": "string" },
            "category_suggestion": { "type": "string" },
            "payment_method_guess": { "type": "string", "enum": ["CARD", "CASH", "TRANSFER", "OTHER"] },
            "project_code_guess": { "type": "string" },
            "notes": { "type": "string" }
        },
        "required": [
            "vendor", "expense_date", "amount_gross", "tax_amount", "amount_net",
            "tax_rate", "tax_label", "currency", "document_country",
            "category_suggestion", "payment_method_guess"
        ]
    })
}

const EXTRACTION_ROLE: &str = "You are a multi-country financial expert system \
for extracting data from receipts and invoices.";

const OUTPUT_STRUCTURE: &str = r#"Extract the data from the document and return ONLY valid JSON with this exact structure:

{
  "vendor": "string",
  "expense_date": "YYYY-MM-DD",
  "amount_gross": 0.00,
  "tax_amount": 0.00,
  "amount_net": 0.00,
  "tax_rate": 0.00,
  "tax_label": "VAT|IVA|GST|NONE",
  "currency": "EUR|USD|GBP|CHF",
  "document_country": "ES|FR|US|...",
  "vendor_vat_id": "string|null",
  "category_suggestion": "string",
  "payment_method_guess": "CARD|CASH|TRANSFER|OTHER",
  "project_code_guess": "string|null",
  "notes": "string|null"
}"#;

const EXTRACTION_RULES: &str = r#"IMPORTANT RULES:
- Detect the issuing country of the document automatically
- Normalize all dates to YYYY-MM-DD format
- Use a dot (.) as the decimal separator in numbers
- If category_suggestion does not exactly match one of the available categories, use "Other"
- For tax_label: IVA for Spain, VAT for other European countries, GST for the United Kingdom, NONE if no tax applies
- Calculate amount_net = amount_gross - tax_amount
- If there is no tax, tax_amount=0, tax_rate=0, tax_label="NONE"
- Return ONLY the JSON, no additional text"#;
