//! Lays a quotation out as an ordered list of pages.
//!
//! The output is a plain value tree: the same quotation and page layout
//! always produce an equal `Document`. Serializing it to Typst happens in
//! [`super::typst`].

use super::common::format_currency;
use super::pages::{StaticPage, StaticPageLayout};
use super::DocumentError;
use crate::quote::model::Quotation;
use crate::quote::totals::compute_totals;
use crate::quote::validation::Validator;

const QUOTE_TITLE: &str = "QUOTE";
const SUBTOTAL_LABEL: &str = "Subtotal:";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Static(StaticPage),
    Data(DataPage),
}

/// The single page generated from quotation fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPage {
    pub header: Header,
    pub table: ItemTable,
    /// Top-to-bottom order; the grand total is always last.
    pub totals: Vec<TotalsRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub left: HeaderColumn,
    pub right: HeaderColumn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderColumn {
    pub title: String,
    pub fields: Vec<HeaderField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderField {
    pub label: String,
    pub lines: Vec<String>,
    pub emphasis: bool,
}

impl HeaderField {
    fn emphasized(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            lines: vec![value.to_string()],
            emphasis: true,
        }
    }

    fn block(label: &str, lines: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            emphasis: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemTable {
    pub room_header: String,
    pub description_header: String,
    pub amount_header: String,
    pub rows: Vec<ItemRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub category: String,
    pub description: String,
    /// Already formatted; empty for unpriced items.
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsRowKind {
    Subtotal,
    Tax,
    GrandTotal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalsRow {
    pub kind: TotalsRowKind,
    pub label: String,
    pub amount: String,
}

impl Document {
    pub fn data_page(&self) -> Option<&DataPage> {
        self.pages.iter().find_map(|page| match page {
            Page::Data(data) => Some(data),
            Page::Static(_) => None,
        })
    }

    pub fn static_pages(&self) -> impl Iterator<Item = &StaticPage> {
        self.pages.iter().filter_map(|page| match page {
            Page::Static(p) => Some(p),
            Page::Data(_) => None,
        })
    }
}

/// Build the full proposal for a quotation.
///
/// Fails without producing anything if the quotation is missing required
/// fields or any configured background page cannot be found.
pub fn assemble(quotation: &Quotation, layout: &StaticPageLayout) -> Result<Document, DocumentError> {
    quotation
        .validate()
        .map_err(DocumentError::InvalidQuotation)?;

    let before = layout.resolve_before()?;
    let after = layout.resolve_after()?;

    let mut pages = Vec::with_capacity(before.len() + after.len() + 1);
    pages.extend(before.into_iter().map(Page::Static));
    pages.push(Page::Data(build_data_page(quotation)));
    pages.extend(after.into_iter().map(Page::Static));

    Ok(Document {
        title: format!("Quote {}", quotation.quote_details.quote_number),
        pages,
    })
}

fn build_data_page(quotation: &Quotation) -> DataPage {
    DataPage {
        header: build_header(quotation),
        table: build_table(quotation),
        totals: build_totals(quotation),
    }
}

fn build_header(quotation: &Quotation) -> Header {
    let quote = &quotation.quote_details;
    let client = &quotation.client_details;
    let company = &quotation.company_details;

    let left = HeaderColumn {
        title: QUOTE_TITLE.to_string(),
        fields: vec![
            HeaderField::emphasized("QUOTE #", &quote.quote_number),
            HeaderField::block("ISSUED TO", &[&client.name, &client.address_line1, &client.phone]),
            HeaderField::emphasized("ISSUE DATE", &quote.issue_date),
        ],
    };

    let right = HeaderColumn {
        title: company.name.clone(),
        fields: vec![
            HeaderField::emphasized("BID NO", &quote.bid_number),
            HeaderField::block(
                "COMPANY ADDRESS",
                &[&company.address, &company.email, &company.phone],
            ),
            HeaderField::emphasized("EXPIRY DATE", &quote.expiry_date),
        ],
    };

    Header { left, right }
}

fn build_table(quotation: &Quotation) -> ItemTable {
    let headers = &quotation.column_headers;
    ItemTable {
        room_header: headers.room.clone(),
        description_header: headers.description.clone(),
        amount_header: headers.amount.clone(),
        rows: quotation
            .items
            .iter()
            .map(|item| ItemRow {
                category: item.category.clone(),
                description: item.description.clone(),
                amount: item.amount.map(format_currency).unwrap_or_default(),
            })
            .collect(),
    }
}

fn build_totals(quotation: &Quotation) -> Vec<TotalsRow> {
    let tax = quotation.tax_details.as_ref();
    let totals = compute_totals(&quotation.items, tax);

    let mut rows = Vec::with_capacity(3);
    if let Some(tax) = tax.filter(|t| t.enabled && t.display_as_separate_row) {
        rows.push(TotalsRow {
            kind: TotalsRowKind::Subtotal,
            label: SUBTOTAL_LABEL.to_string(),
            amount: format_currency(totals.subtotal),
        });
        rows.push(TotalsRow {
            kind: TotalsRowKind::Tax,
            label: format!("{}:", tax.description),
            amount: format_currency(totals.tax_amount),
        });
    }
    rows.push(TotalsRow {
        kind: TotalsRowKind::GrandTotal,
        label: quotation.total_details.label.clone(),
        amount: format_currency(totals.grand_total),
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::model::{LineItem, TaxConfiguration, TaxKind};
    use crate::quote::template::sample_quotation;
    use std::fs;
    use tempfile::TempDir;

    fn layout_with_pages() -> (TempDir, StaticPageLayout) {
        let dir = tempfile::tempdir().unwrap();
        for i in [1, 2, 3, 4, 5, 7, 8, 9] {
            fs::write(dir.path().join(format!("{i}.jpg")), b"jpeg").unwrap();
        }
        let layout = StaticPageLayout::new(dir.path());
        (dir, layout)
    }

    fn priced_quotation(tax: Option<TaxConfiguration>) -> Quotation {
        let mut quotation = sample_quotation();
        quotation.items = [Some(100.0), None, Some(50.0)]
            .into_iter()
            .enumerate()
            .map(|(i, amount)| LineItem {
                category: format!("Room {i}"),
                description: String::new(),
                amount,
            })
            .collect();
        quotation.tax_details = tax;
        quotation
    }

    #[test]
    fn test_page_order() {
        let (_dir, layout) = layout_with_pages();
        let document = assemble(&sample_quotation(), &layout).unwrap();

        assert_eq!(document.pages.len(), 9);
        assert!(matches!(document.pages[5], Page::Data(_)));
        let indices: Vec<u32> = document.static_pages().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let (_dir, layout) = layout_with_pages();
        let quotation = sample_quotation();
        assert_eq!(
            assemble(&quotation, &layout).unwrap(),
            assemble(&quotation, &layout).unwrap()
        );
    }

    #[test]
    fn test_header_columns() {
        let (_dir, layout) = layout_with_pages();
        let document = assemble(&sample_quotation(), &layout).unwrap();
        let header = &document.data_page().unwrap().header;

        assert_eq!(header.left.title, "QUOTE");
        assert_eq!(header.left.fields[0].lines, vec!["1000136"]);
        assert_eq!(header.left.fields[1].label, "ISSUED TO");
        assert_eq!(header.left.fields[1].lines.len(), 3);
        assert_eq!(header.left.fields[2].lines, vec!["2025-12-16"]);

        assert_eq!(header.right.title, "JRJ Contractors");
        assert_eq!(header.right.fields[0].label, "BID NO");
        assert_eq!(header.right.fields[1].lines[1], "info@jrjcontractors.com.au");
        assert_eq!(header.right.fields[2].lines, vec!["2026-01-15"]);
    }

    #[test]
    fn test_unpriced_item_renders_blank_amount() {
        let (_dir, layout) = layout_with_pages();
        let document = assemble(&priced_quotation(None), &layout).unwrap();
        let rows = &document.data_page().unwrap().table.rows;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].amount, "$100.00");
        assert_eq!(rows[1].amount, "");
        assert_eq!(rows[2].amount, "$50.00");
        assert!(rows.iter().all(|r| r.amount != "$0.00"));
    }

    #[test]
    fn test_rows_keep_item_order() {
        let (_dir, layout) = layout_with_pages();
        let document = assemble(&priced_quotation(None), &layout).unwrap();
        let categories: Vec<&str> = document
            .data_page()
            .unwrap()
            .table
            .rows
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Room 0", "Room 1", "Room 2"]);
    }

    #[test]
    fn test_separate_tax_rows_in_order() {
        let (_dir, layout) = layout_with_pages();
        let tax = TaxConfiguration {
            enabled: true,
            kind: TaxKind::Fixed,
            value: 20.0,
            description: "GST".to_string(),
            display_as_separate_row: true,
        };
        let document = assemble(&priced_quotation(Some(tax)), &layout).unwrap();
        let totals = &document.data_page().unwrap().totals;

        let kinds: Vec<TotalsRowKind> = totals.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![TotalsRowKind::Subtotal, TotalsRowKind::Tax, TotalsRowKind::GrandTotal]
        );
        assert_eq!(totals[0].amount, "$150.00");
        assert_eq!(totals[1].label, "GST:");
        assert_eq!(totals[1].amount, "$20.00");
        assert_eq!(totals[2].label, "All Totals Inc GST");
        assert_eq!(totals[2].amount, "$170.00");
    }

    #[test]
    fn test_inline_tax_shows_only_grand_total() {
        let (_dir, layout) = layout_with_pages();
        let tax = TaxConfiguration {
            enabled: true,
            kind: TaxKind::Percentage,
            value: 10.0,
            description: "GST".to_string(),
            display_as_separate_row: false,
        };
        let document = assemble(&priced_quotation(Some(tax)), &layout).unwrap();
        let totals = &document.data_page().unwrap().totals;

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].amount, "$165.00");
    }

    #[test]
    fn test_disabled_tax_never_appears() {
        let (_dir, layout) = layout_with_pages();
        let tax = TaxConfiguration {
            enabled: false,
            kind: TaxKind::Fixed,
            value: 20.0,
            description: "GST".to_string(),
            display_as_separate_row: true,
        };
        let document = assemble(&priced_quotation(Some(tax)), &layout).unwrap();
        let totals = &document.data_page().unwrap().totals;

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].amount, "$150.00");
    }

    #[test]
    fn test_grand_total_ignores_stale_stored_total() {
        let (_dir, layout) = layout_with_pages();
        let mut quotation = priced_quotation(None);
        quotation.total_details.total_amount = 99999.0;

        let document = assemble(&quotation, &layout).unwrap();
        let grand = document.data_page().unwrap().totals.last().unwrap();
        assert_eq!(grand.amount, "$150.00");
    }

    #[test]
    fn test_missing_static_page_fails() {
        let (dir, layout) = layout_with_pages();
        fs::remove_file(dir.path().join("8.jpg")).unwrap();

        match assemble(&sample_quotation(), &layout) {
            Err(DocumentError::MissingStaticPage { index, .. }) => assert_eq!(index, 8),
            other => panic!("expected missing page error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_quotation_fails() {
        let (_dir, layout) = layout_with_pages();
        let mut quotation = sample_quotation();
        quotation.company_details.name = String::new();

        let err = assemble(&quotation, &layout).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidQuotation(ref m) if m.contains("companyDetails.name")));
    }
}
