/// Invoice submission schema
///
/// Turns the raw form map of a create or update submission into typed,
/// validated data. Validation runs in two stages: every field is first
/// coerced to its target type, then all field rules are checked together so
/// that one report lists every failing field.
///
/// | field        | coercion                         | rule            |
/// |--------------|----------------------------------|-----------------|
/// | `customerId` | missing → empty string           | non-empty       |
/// | `amount`     | dollars → cents, unusable → 0    | at least 1 cent |
/// | `status`     | exact match on `pending`/`paid`  | required        |
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use invoicedesk_shared::invoices::schema::validate_invoice_form;
///
/// let mut form = HashMap::new();
/// form.insert("customerId".to_string(), "3958dc9e-712f-4377-85e9-fec4b6a6442a".to_string());
/// form.insert("amount".to_string(), "45.00".to_string());
/// form.insert("status".to_string(), "pending".to_string());
///
/// let invoice = validate_invoice_form(&form).unwrap();
/// assert_eq!(invoice.amount_cents, 4500);
/// ```

use std::collections::{BTreeMap, HashMap};

use validator::{Validate, ValidationErrors};

use crate::models::invoice::InvoiceStatus;

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than $0.";
pub const STATUS_REQUIRED: &str = "Please select an invoice status.";

/// Field name → messages for every field that failed validation
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Invoice submission after coercion and validation
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct InvoiceSubmission {
    #[validate(length(min = 1, message = "Please select a customer."))]
    pub customer_id: String,

    #[validate(range(min = 1, message = "Please enter an amount greater than $0."))]
    pub amount_cents: i64,

    #[validate(required(message = "Please select an invoice status."))]
    pub status: Option<InvoiceStatus>,
}

/// Validated invoice fields, ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInvoice {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

impl InvoiceSubmission {
    /// Coerces a raw form map without judging it
    pub fn coerce(raw: &HashMap<String, String>) -> Self {
        Self {
            customer_id: raw.get("customerId").cloned().unwrap_or_default(),
            amount_cents: coerce_cents(raw.get("amount").map(String::as_str)),
            status: raw
                .get("status")
                .and_then(|s| InvoiceStatus::parse(s)),
        }
    }
}

/// Converts a submitted dollar amount to cents
///
/// Blank, non-numeric and non-finite input coerce to 0. The result is
/// rounded to the nearest cent.
pub fn coerce_cents(raw: Option<&str>) -> i64 {
    let dollars = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite())
        .unwrap_or(0.0);

    (dollars * 100.0).round() as i64
}

/// Validates a create/update submission
///
/// # Errors
///
/// Returns the aggregated field report when any rule fails. Keys use the
/// form's field names (`customerId`, `amount`, `status`).
pub fn validate_invoice_form(raw: &HashMap<String, String>) -> Result<ValidInvoice, FieldErrors> {
    let submission = InvoiceSubmission::coerce(raw);

    submission.validate().map_err(field_errors)?;

    match submission.status {
        Some(status) => Ok(ValidInvoice {
            customer_id: submission.customer_id,
            amount_cents: submission.amount_cents,
            status,
        }),
        None => Err(BTreeMap::from([(
            "status".to_string(),
            vec![STATUS_REQUIRED.to_string()],
        )])),
    }
}

fn field_errors(errors: ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string())
                })
                .collect();
            (form_field(field).to_string(), messages)
        })
        .collect()
}

fn form_field(field: &str) -> &str {
    match field {
        "customer_id" => "customerId",
        "amount_cents" => "amount",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_submission() {
        let valid = validate_invoice_form(&form(&[
            ("customerId", "cust-1"),
            ("amount", "45.00"),
            ("status", "paid"),
        ]))
        .unwrap();

        assert_eq!(valid.customer_id, "cust-1");
        assert_eq!(valid.amount_cents, 4500);
        assert_eq!(valid.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_empty_submission_reports_every_field() {
        let errors = validate_invoice_form(&HashMap::new()).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors["customerId"], vec![CUSTOMER_REQUIRED]);
        assert_eq!(errors["amount"], vec![AMOUNT_NOT_POSITIVE]);
        assert_eq!(errors["status"], vec![STATUS_REQUIRED]);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        for amount in ["0", "-5", "-0.01", "", "   ", "abc", "NaN", "inf", "0.004"] {
            let errors = validate_invoice_form(&form(&[
                ("customerId", "cust-1"),
                ("amount", amount),
                ("status", "pending"),
            ]))
            .unwrap_err();

            assert_eq!(
                errors.keys().collect::<Vec<_>>(),
                vec!["amount"],
                "amount {:?} should fail alone",
                amount
            );
            assert_eq!(errors["amount"], vec![AMOUNT_NOT_POSITIVE]);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let errors = validate_invoice_form(&form(&[
            ("customerId", "cust-1"),
            ("amount", "10"),
            ("status", "overdue"),
        ]))
        .unwrap_err();

        assert_eq!(errors["status"], vec![STATUS_REQUIRED]);
        assert!(!errors.contains_key("amount"));
    }

    #[test]
    fn test_coerce_cents() {
        assert_eq!(coerce_cents(Some("45")), 4500);
        assert_eq!(coerce_cents(Some(" 12.34 ")), 1234);
        assert_eq!(coerce_cents(Some("0.1")), 10);
        assert_eq!(coerce_cents(Some("19.999")), 2000);
        assert_eq!(coerce_cents(Some("1e2")), 10000);
        assert_eq!(coerce_cents(Some("twelve")), 0);
        assert_eq!(coerce_cents(None), 0);
    }
}
