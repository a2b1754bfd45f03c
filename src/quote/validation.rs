//! Input validation for quotations and user accounts.
//!
//! Errors are collected rather than returned on the first failure so the
//! form can highlight every problem at once.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::model::Quotation;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid");
}

/// Trait for validating request objects.
pub trait Validator {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `items[2].category`
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} is required", label))
    }

    pub fn invalid_email(field: &str) -> Self {
        Self::new(field, "Email address is not valid")
            .with_suggestion("Use a full address such as info@example.com")
    }

    pub fn not_finite(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must be a finite number", label))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// One line per error, prefixed with a count.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} error(s) found",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

pub fn validate_email(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, "Email"));
        return;
    }
    if !EMAIL_RE.is_match(trimmed) {
        errors.add(ValidationError::invalid_email(field));
    }
}

pub fn validate_finite(value: f64, field: &str, label: &str, errors: &mut ValidationErrors) {
    if !value.is_finite() {
        errors.add(ValidationError::not_finite(field, label));
    }
}

impl Validator for Quotation {
    fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();

        let quote = &self.quote_details;
        validate_required(&quote.quote_number, "quoteDetails.quoteNumber", "Quote number", &mut errors);
        validate_required(&quote.issue_date, "quoteDetails.issueDate", "Issue date", &mut errors);
        validate_required(&quote.expiry_date, "quoteDetails.expiryDate", "Expiry date", &mut errors);
        validate_required(&quote.bid_number, "quoteDetails.bidNumber", "Bid number", &mut errors);

        let client = &self.client_details;
        validate_required(&client.name, "clientDetails.name", "Client name", &mut errors);
        validate_required(
            &client.address_line1,
            "clientDetails.addressLine1",
            "Client address",
            &mut errors,
        );
        validate_required(&client.phone, "clientDetails.phone", "Client phone", &mut errors);

        let company = &self.company_details;
        validate_required(&company.name, "companyDetails.name", "Company name", &mut errors);
        validate_required(&company.address, "companyDetails.address", "Company address", &mut errors);
        validate_required(&company.email, "companyDetails.email", "Company email", &mut errors);
        validate_required(&company.phone, "companyDetails.phone", "Company phone", &mut errors);

        for (i, item) in self.items.iter().enumerate() {
            validate_required(&item.category, &format!("items[{i}].category"), "Category", &mut errors);
            if let Some(amount) = item.amount {
                validate_finite(amount, &format!("items[{i}].amount"), "Amount", &mut errors);
            }
        }

        if let Some(tax) = &self.tax_details {
            validate_finite(tax.value, "taxDetails.value", "Tax value", &mut errors);
        }

        validate_required(&self.total_details.label, "totalDetails.label", "Total label", &mut errors);
        validate_finite(
            self.total_details.total_amount,
            "totalDetails.totalAmount",
            "Total amount",
            &mut errors,
        );

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::template::sample_quotation;

    #[test]
    fn test_sample_quotation_is_valid() {
        assert!(sample_quotation().validate().is_ok());
    }

    #[test]
    fn test_blank_fields_are_reported_individually() {
        let mut quotation = sample_quotation();
        quotation.quote_details.quote_number = "   ".to_string();
        quotation.client_details.phone = String::new();
        quotation.items[0].category = String::new();

        let message = quotation.validate().unwrap_err();
        assert!(message.contains("3 error(s)"));
        assert!(message.contains("quoteDetails.quoteNumber"));
        assert!(message.contains("clientDetails.phone"));
        assert!(message.contains("items[0].category"));
    }

    #[test]
    fn test_unpriced_item_is_valid() {
        let mut quotation = sample_quotation();
        quotation.items[0].amount = None;
        quotation.items[0].description = String::new();
        assert!(quotation.validate().is_ok());
    }

    #[test]
    fn test_non_finite_amount_is_rejected() {
        let mut quotation = sample_quotation();
        quotation.items[0].amount = Some(f64::NAN);
        let message = quotation.validate().unwrap_err();
        assert!(message.contains("items[0].amount"));
    }

    #[test]
    fn test_validate_email() {
        let mut errors = ValidationErrors::new();
        validate_email("admin@example.com", "email", &mut errors);
        assert!(errors.is_empty());

        validate_email("not-an-email", "email", &mut errors);
        validate_email("", "email", &mut errors);
        assert_eq!(errors.len(), 2);
        assert!(errors.errors()[0].suggestion.is_some());
    }
}
