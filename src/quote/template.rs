//! Starting point for a new quotation.

use chrono::{Duration, NaiveDate};

use super::model::{
    ClientDetails, ColumnHeaders, CompanyDetails, LineItem, QuoteDetails, Quotation,
    TaxConfiguration, TaxKind, TotalDetails,
};

const EXPIRY_DAYS: i64 = 30;
const DEFAULT_TOTAL_LABEL: &str = "All Totals Inc GST";
const DEFAULT_TAX_DESCRIPTION: &str = "GST (10%)";
const DEFAULT_TAX_RATE: f64 = 10.0;

/// Build an empty draft issued on `today` and valid for thirty days.
///
/// Tax starts disabled but preconfigured as a separate 10% GST row so that
/// enabling it is a single edit.
pub fn new_draft(company: &CompanyDetails, today: NaiveDate) -> Quotation {
    let expiry = today + Duration::days(EXPIRY_DAYS);

    Quotation {
        quote_details: QuoteDetails {
            quote_number: String::new(),
            issue_date: today.format("%Y-%m-%d").to_string(),
            expiry_date: expiry.format("%Y-%m-%d").to_string(),
            bid_number: String::new(),
        },
        client_details: ClientDetails {
            name: String::new(),
            address_line1: String::new(),
            phone: String::new(),
        },
        company_details: company.clone(),
        column_headers: ColumnHeaders::default(),
        items: vec![LineItem {
            category: "Kitchen".to_string(),
            description: String::new(),
            amount: Some(0.0),
        }],
        tax_details: Some(TaxConfiguration {
            enabled: false,
            kind: TaxKind::Percentage,
            value: DEFAULT_TAX_RATE,
            description: DEFAULT_TAX_DESCRIPTION.to_string(),
            display_as_separate_row: true,
        }),
        total_details: TotalDetails {
            label: DEFAULT_TOTAL_LABEL.to_string(),
            total_amount: 0.0,
        },
    }
}

/// A fully populated quotation for tests.
#[cfg(test)]
pub fn sample_quotation() -> Quotation {
    Quotation {
        quote_details: QuoteDetails {
            quote_number: "1000136".to_string(),
            issue_date: "2025-12-16".to_string(),
            expiry_date: "2026-01-15".to_string(),
            bid_number: "351253".to_string(),
        },
        client_details: ClientDetails {
            name: "Francisco Andrade".to_string(),
            address_line1: "Project Street Sydney 2000".to_string(),
            phone: "+61 412 123 456".to_string(),
        },
        company_details: CompanyDetails {
            name: "JRJ Contractors".to_string(),
            address: "78B Millicent St, Athol Park, Adelaide, 5012, South Australia".to_string(),
            email: "info@jrjcontractors.com.au".to_string(),
            phone: "+61 412 962 127".to_string(),
        },
        column_headers: ColumnHeaders::default(),
        items: vec![LineItem {
            category: "Kitchen".to_string(),
            description: "Flat Panel Melamine Doors\nHettich Soft Close Drawers".to_string(),
            amount: Some(15585.0),
        }],
        tax_details: Some(TaxConfiguration {
            enabled: false,
            kind: TaxKind::Percentage,
            value: 10.0,
            description: "GST (10%)".to_string(),
            display_as_separate_row: true,
        }),
        total_details: TotalDetails {
            label: DEFAULT_TOTAL_LABEL.to_string(),
            total_amount: 15585.0,
        },
    }
}
