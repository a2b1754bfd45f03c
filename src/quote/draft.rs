//! Typed edits for a working draft.
//!
//! Every editable field has its own variant so a value can never be written
//! into a field of the wrong type.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::model::{LineItem, Quotation, TaxConfiguration, TaxKind};
use super::totals::compute_totals;

const NEW_ITEM_CATEGORY: &str = "New Category";

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("item index {index} is out of range (draft has {len} items)")]
    ItemOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    QuoteNumber(String),
    IssueDate(String),
    ExpiryDate(String),
    BidNumber(String),

    ClientName(String),
    ClientAddress(String),
    ClientPhone(String),

    CompanyName(String),
    CompanyAddress(String),
    CompanyEmail(String),
    CompanyPhone(String),

    RoomHeader(String),
    DescriptionHeader(String),
    AmountHeader(String),

    ItemCategory { index: usize, category: String },
    ItemDescription { index: usize, description: String },
    ItemAmount { index: usize, amount: Option<f64> },
    AddItem,
    RemoveItem { index: usize },

    TaxEnabled(bool),
    TaxKind(TaxKind),
    TaxValue(f64),
    TaxDescription(String),
    TaxSeparateRow(bool),

    TotalLabel(String),
    TotalAmount(f64),
}

fn item_mut(draft: &mut Quotation, index: usize) -> Result<&mut LineItem, DraftError> {
    let len = draft.items.len();
    draft
        .items
        .get_mut(index)
        .ok_or(DraftError::ItemOutOfRange { index, len })
}

fn tax_mut(draft: &mut Quotation) -> &mut TaxConfiguration {
    draft.tax_details.get_or_insert_with(TaxConfiguration::default)
}

/// Apply one edit to a draft. On error the draft is left untouched.
///
/// Editing an item amount also rewrites `totalDetails.totalAmount` with the
/// new subtotal, matching what the form has always done. That stored figure
/// is display-only; rendering recomputes the grand total.
pub fn apply_update(draft: &mut Quotation, update: FieldUpdate) -> Result<(), DraftError> {
    match update {
        FieldUpdate::QuoteNumber(v) => draft.quote_details.quote_number = v,
        FieldUpdate::IssueDate(v) => draft.quote_details.issue_date = v,
        FieldUpdate::ExpiryDate(v) => draft.quote_details.expiry_date = v,
        FieldUpdate::BidNumber(v) => draft.quote_details.bid_number = v,

        FieldUpdate::ClientName(v) => draft.client_details.name = v,
        FieldUpdate::ClientAddress(v) => draft.client_details.address_line1 = v,
        FieldUpdate::ClientPhone(v) => draft.client_details.phone = v,

        FieldUpdate::CompanyName(v) => draft.company_details.name = v,
        FieldUpdate::CompanyAddress(v) => draft.company_details.address = v,
        FieldUpdate::CompanyEmail(v) => draft.company_details.email = v,
        FieldUpdate::CompanyPhone(v) => draft.company_details.phone = v,

        FieldUpdate::RoomHeader(v) => draft.column_headers.room = v,
        FieldUpdate::DescriptionHeader(v) => draft.column_headers.description = v,
        FieldUpdate::AmountHeader(v) => draft.column_headers.amount = v,

        FieldUpdate::ItemCategory { index, category } => item_mut(draft, index)?.category = category,
        FieldUpdate::ItemDescription { index, description } => {
            item_mut(draft, index)?.description = description
        }
        FieldUpdate::ItemAmount { index, amount } => {
            item_mut(draft, index)?.amount = amount;
            draft.total_details.total_amount = compute_totals(&draft.items, None).subtotal;
        }
        FieldUpdate::AddItem => draft.items.push(LineItem {
            category: NEW_ITEM_CATEGORY.to_string(),
            description: String::new(),
            amount: Some(0.0),
        }),
        FieldUpdate::RemoveItem { index } => {
            let len = draft.items.len();
            if index >= len {
                return Err(DraftError::ItemOutOfRange { index, len });
            }
            draft.items.remove(index);
        }

        FieldUpdate::TaxEnabled(v) => tax_mut(draft).enabled = v,
        FieldUpdate::TaxKind(v) => tax_mut(draft).kind = v,
        FieldUpdate::TaxValue(v) => tax_mut(draft).value = v,
        FieldUpdate::TaxDescription(v) => tax_mut(draft).description = v,
        FieldUpdate::TaxSeparateRow(v) => tax_mut(draft).display_as_separate_row = v,

        FieldUpdate::TotalLabel(v) => draft.total_details.label = v,
        FieldUpdate::TotalAmount(v) => draft.total_details.total_amount = v,
    }
    Ok(())
}

/// Apply edits in order, stopping at the first failure.
pub fn apply_updates(
    draft: &mut Quotation,
    updates: impl IntoIterator<Item = FieldUpdate>,
) -> Result<(), DraftError> {
    for update in updates {
        apply_update(draft, update)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::template::sample_quotation;

    #[test]
    fn test_scalar_field_updates() {
        let mut draft = sample_quotation();
        apply_update(&mut draft, FieldUpdate::QuoteNumber("42".to_string())).unwrap();
        apply_update(&mut draft, FieldUpdate::ClientAddress("1 Main St".to_string())).unwrap();
        apply_update(&mut draft, FieldUpdate::AmountHeader("PRICE".to_string())).unwrap();

        assert_eq!(draft.quote_details.quote_number, "42");
        assert_eq!(draft.client_details.address_line1, "1 Main St");
        assert_eq!(draft.column_headers.amount, "PRICE");
    }

    #[test]
    fn test_item_amount_recomputes_stored_total() {
        let mut draft = sample_quotation();
        apply_update(&mut draft, FieldUpdate::AddItem).unwrap();
        apply_update(&mut draft, FieldUpdate::ItemAmount { index: 0, amount: Some(100.0) }).unwrap();
        apply_update(&mut draft, FieldUpdate::ItemAmount { index: 1, amount: None }).unwrap();

        assert_eq!(draft.items[1].amount, None);
        assert_eq!(draft.total_details.total_amount, 100.0);
    }

    #[test]
    fn test_out_of_range_index_leaves_draft_unchanged() {
        let mut draft = sample_quotation();
        let before = draft.clone();

        let err = apply_update(
            &mut draft,
            FieldUpdate::ItemDescription { index: 7, description: "x".to_string() },
        )
        .unwrap_err();
        assert_eq!(err, DraftError::ItemOutOfRange { index: 7, len: 1 });

        let err = apply_update(&mut draft, FieldUpdate::RemoveItem { index: 1 }).unwrap_err();
        assert_eq!(err, DraftError::ItemOutOfRange { index: 1, len: 1 });

        assert_eq!(draft, before);
    }

    #[test]
    fn test_add_and_remove_items() {
        let mut draft = sample_quotation();
        apply_update(&mut draft, FieldUpdate::AddItem).unwrap();
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[1].category, "New Category");
        assert_eq!(draft.items[1].amount, Some(0.0));

        apply_update(&mut draft, FieldUpdate::RemoveItem { index: 0 }).unwrap();
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].category, "New Category");
    }

    #[test]
    fn test_tax_update_creates_configuration() {
        let mut draft = sample_quotation();
        draft.tax_details = None;

        apply_update(&mut draft, FieldUpdate::TaxEnabled(true)).unwrap();
        apply_update(&mut draft, FieldUpdate::TaxKind(TaxKind::Fixed)).unwrap();
        apply_update(&mut draft, FieldUpdate::TaxValue(20.0)).unwrap();

        let tax = draft.tax_details.unwrap();
        assert!(tax.enabled);
        assert_eq!(tax.kind, TaxKind::Fixed);
        assert_eq!(tax.value, 20.0);
        assert_eq!(tax.description, "Tax");
    }

    #[test]
    fn test_apply_updates_stops_at_first_error() {
        let mut draft = sample_quotation();
        let result = apply_updates(
            &mut draft,
            vec![
                FieldUpdate::BidNumber("B-1".to_string()),
                FieldUpdate::RemoveItem { index: 9 },
                FieldUpdate::BidNumber("B-2".to_string()),
            ],
        );

        assert!(result.is_err());
        assert_eq!(draft.quote_details.bid_number, "B-1");
    }

    #[test]
    fn test_field_update_wire_format() {
        let update: FieldUpdate =
            serde_json::from_str(r#"{"field": "itemAmount", "value": {"index": 0, "amount": null}}"#)
                .unwrap();
        assert_eq!(update, FieldUpdate::ItemAmount { index: 0, amount: None });

        let update: FieldUpdate = serde_json::from_str(r#"{"field": "taxKind", "value": "fixed"}"#).unwrap();
        assert_eq!(update, FieldUpdate::TaxKind(TaxKind::Fixed));

        let update: FieldUpdate = serde_json::from_str(r#"{"field": "addItem"}"#).unwrap();
        assert_eq!(update, FieldUpdate::AddItem);
    }
}
