//! Cross-check of the declared total sales against the row amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::audit::LineItem;

/// Where the final total sales figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    /// Printed on the sheet.
    Declared,
    /// Sum of the row sales amounts.
    Computed,
    /// Neither was available.
    Absent,
}

/// Reconciled total sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSales {
    pub value: Option<Decimal>,
    pub source: TotalSource,
    /// Sum of the row sales amounts, absent amounts counted as zero.
    pub computed: Decimal,
}

impl TotalSales {
    /// Declared and computed totals disagree.
    pub fn mismatch(&self) -> Option<Decimal> {
        match (self.source, self.value) {
            (TotalSource::Declared, Some(declared)) if self.computed > Decimal::ZERO => {
                let diff = declared - self.computed;
                (!diff.is_zero()).then_some(diff)
            }
            _ => None,
        }
    }
}

/// Prefer the declared total; fall back to a positive computed sum.
pub fn reconcile_total_sales(declared: Option<Decimal>, items: &[LineItem]) -> TotalSales {
    let computed: Decimal = items.iter().filter_map(|i| i.sales_amount).sum();

    match declared {
        Some(value) => TotalSales {
            value: Some(value),
            source: TotalSource::Declared,
            computed,
        },
        None if computed > Decimal::ZERO => TotalSales {
            value: Some(computed),
            source: TotalSource::Computed,
            computed,
        },
        None => TotalSales {
            value: None,
            source: TotalSource::Absent,
            computed,
        },
    }
}
