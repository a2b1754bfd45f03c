//! Quotation pricing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::{LineItem, TaxConfiguration, TaxKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
}

/// Compute subtotal, tax and grand total for a list of items.
///
/// Unpriced items count as zero. A missing or disabled tax configuration
/// contributes nothing regardless of its kind or value. Always call this on
/// the current items; nothing is cached between calls.
pub fn compute_totals(items: &[LineItem], tax: Option<&TaxConfiguration>) -> Totals {
    let subtotal: f64 = items.iter().map(|item| item.amount.unwrap_or(0.0)).sum();

    let tax_amount = match tax {
        Some(tax) if tax.enabled => match tax.kind {
            TaxKind::Percentage => subtotal * tax.value / 100.0,
            TaxKind::Fixed => tax.value,
        },
        _ => 0.0,
    };

    Totals {
        subtotal,
        tax_amount,
        grand_total: subtotal + tax_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(amount: Option<f64>) -> LineItem {
        LineItem {
            category: "Kitchen".to_string(),
            description: String::new(),
            amount,
        }
    }

    fn sample_items() -> Vec<LineItem> {
        vec![item(Some(100.0)), item(None), item(Some(50.0))]
    }

    fn tax(kind: TaxKind, value: f64, enabled: bool) -> TaxConfiguration {
        TaxConfiguration {
            enabled,
            kind,
            value,
            description: "GST".to_string(),
            display_as_separate_row: true,
        }
    }

    #[test]
    fn test_tax_disabled_scenario() {
        let totals = compute_totals(&sample_items(), Some(&tax(TaxKind::Percentage, 10.0, false)));
        assert_eq!(totals.subtotal, 150.0);
        assert_eq!(totals.tax_amount, 0.0);
        assert_eq!(totals.grand_total, 150.0);
    }

    #[test]
    fn test_missing_tax_configuration() {
        let totals = compute_totals(&sample_items(), None);
        assert_eq!(totals.tax_amount, 0.0);
        assert_eq!(totals.grand_total, totals.subtotal);
    }

    #[test]
    fn test_disabled_fixed_tax_is_ignored() {
        let totals = compute_totals(&sample_items(), Some(&tax(TaxKind::Fixed, 999.0, false)));
        assert_eq!(totals.tax_amount, 0.0);
        assert_eq!(totals.grand_total, 150.0);
    }

    #[test]
    fn test_percentage_tax_scenario() {
        let totals = compute_totals(&sample_items(), Some(&tax(TaxKind::Percentage, 10.0, true)));
        assert!((totals.tax_amount - 15.0).abs() < 1e-9);
        assert!((totals.grand_total - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_tax_scenario() {
        let totals = compute_totals(&sample_items(), Some(&tax(TaxKind::Fixed, 20.0, true)));
        assert_eq!(totals.subtotal, 150.0);
        assert_eq!(totals.tax_amount, 20.0);
        assert_eq!(totals.grand_total, 170.0);
    }

    #[test]
    fn test_percentage_matches_formula_for_odd_values() {
        let items = vec![item(Some(1234.56)), item(Some(0.01)), item(None)];
        let config = tax(TaxKind::Percentage, 7.25, true);
        let totals = compute_totals(&items, Some(&config));

        let expected_subtotal = 1234.56 + 0.01;
        assert!((totals.subtotal - expected_subtotal).abs() < 1e-9);
        assert!((totals.tax_amount - expected_subtotal * 7.25 / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_items() {
        let totals = compute_totals(&[], Some(&tax(TaxKind::Fixed, 20.0, true)));
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.grand_total, 20.0);
    }

    #[test]
    fn test_all_unpriced_items() {
        let totals = compute_totals(&[item(None), item(None)], None);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.grand_total, 0.0);
    }
}
