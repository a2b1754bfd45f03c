use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::totals::Totals;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetails {
    #[schema(example = "1000136")]
    pub quote_number: String,
    /// Passed through verbatim; never reparsed.
    #[schema(example = "2025-12-16")]
    pub issue_date: String,
    #[schema(example = "2026-01-15")]
    pub expiry_date: String,
    #[schema(example = "351253")]
    pub bid_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    #[schema(example = "Francisco Andrade")]
    pub name: String,
    #[schema(example = "Project Street Sydney 2000")]
    pub address_line1: String,
    #[schema(example = "+61 412 123 456")]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    #[schema(example = "JRJ Contractors")]
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// Captions for the three item-table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeaders {
    #[serde(default = "default_room_header")]
    pub room: String,
    #[serde(default = "default_description_header")]
    pub description: String,
    #[serde(default = "default_amount_header")]
    pub amount: String,
}

fn default_room_header() -> String {
    "ROOM".to_string()
}

fn default_description_header() -> String {
    "DESCRIPTION".to_string()
}

fn default_amount_header() -> String {
    "AMOUNT".to_string()
}

impl Default for ColumnHeaders {
    fn default() -> Self {
        Self {
            room: default_room_header(),
            description: default_description_header(),
            amount: default_amount_header(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[schema(example = "Kitchen")]
    pub category: String,
    /// May contain embedded line breaks.
    #[serde(default)]
    pub description: String,
    /// `None` marks an unpriced row; it renders as an empty cell.
    #[serde(default)]
    #[schema(example = 15585.0)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaxKind {
    #[default]
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfiguration {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub kind: TaxKind,
    #[serde(default)]
    #[schema(example = 10.0)]
    pub value: f64,
    #[serde(default = "default_tax_description")]
    #[schema(example = "GST (10%)")]
    pub description: String,
    #[serde(default)]
    pub display_as_separate_row: bool,
}

fn default_tax_description() -> String {
    "Tax".to_string()
}

impl Default for TaxConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: TaxKind::Percentage,
            value: 0.0,
            description: default_tax_description(),
            display_as_separate_row: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalDetails {
    #[schema(example = "All Totals Inc GST")]
    pub label: String,
    /// Display value written by the editing surface. Rendering always
    /// recomputes the grand total instead of trusting this field.
    pub total_amount: f64,
}

/// A quotation as entered on the form, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub quote_details: QuoteDetails,
    pub client_details: ClientDetails,
    pub company_details: CompanyDetails,
    #[serde(default)]
    pub column_headers: ColumnHeaders,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_details: Option<TaxConfiguration>,
    pub total_details: TotalDetails,
}

/// A persisted quotation. Identity and timestamps belong to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuotation {
    pub id: Uuid,
    #[serde(flatten)]
    pub quotation: Quotation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of stored quotations plus the overall record count.
#[derive(Debug, Clone)]
pub struct QuotationListing {
    pub items: Vec<StoredQuotation>,
    pub total: u64,
}

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 9;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, starting at 1.
    pub page: Option<i64>,
    /// Records per page (default 9, max 100).
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Resolve to a usable `(page, limit)` pair. Values below 1 fall back to
    /// the defaults and the limit is capped.
    pub fn resolve(&self) -> (u32, u32) {
        let page = match self.page {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => DEFAULT_PAGE,
        };
        let limit = match self.limit {
            Some(l) if l >= 1 => l.min(MAX_PAGE_SIZE as i64) as u32,
            _ => DEFAULT_PAGE_SIZE,
        };
        (page, limit)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1) as u64),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteListResponse {
    pub quotes: Vec<StoredQuotation>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub quote: StoredQuotation,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Draft plus an ordered list of edits to apply before computing totals.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PreviewRequest {
    pub draft: Quotation,
    #[serde(default)]
    pub updates: Vec<super::draft::FieldUpdate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    pub draft: Quotation,
    pub totals: Totals,
}
