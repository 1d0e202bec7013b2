//! Projection of line items into display rows.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::trace;

use crate::models::audit::{LineItem, Row};

/// Round a stock count to a whole unit; absent counts become zero.
///
/// Counts outside the `i64` range are clamped to its bounds.
fn count(value: Option<Decimal>) -> i64 {
    let Some(value) = value else {
        return 0;
    };

    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or_else(|| {
        trace!("Count {} out of range, clamped", rounded);
        if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Build the row for one line item.
pub fn build_row(item: &LineItem, default_size_ml: u32) -> Row {
    Row {
        brand_name: item.brand_name.clone(),
        size_ml: item.size_ml.unwrap_or(default_size_ml),
        opening: count(item.opening),
        received: count(item.received),
        total: count(item.total),
        others: count(item.others),
        closing: count(item.closing),
        sales_qty: count(item.sales_qty),
        rate: item.rate,
        sales_amount: item.sales_amount,
    }
}

/// Build one row per line item, in the same order.
pub fn build_rows(items: &[LineItem], default_size_ml: u32) -> Vec<Row> {
    items.iter().map(|item| build_row(item, default_size_ml)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_absent_counts_default_to_zero() {
        let item = LineItem {
            brand_name: "Old Monk".to_string(),
            size_ml: Some(180),
            opening: Some(Decimal::from(10)),
            ..Default::default()
        };
        let row = build_row(&item, 750);

        assert_eq!(row.size_ml, 180);
        assert_eq!(row.opening, 10);
        assert_eq!(row.received, 0);
        assert_eq!(row.sales_qty, 0);
        assert_eq!(row.rate, None);
        assert_eq!(row.sales_amount, None);
    }

    #[test]
    fn test_counts_are_rounded_money_is_not() {
        let item = LineItem {
            brand_name: "Old Monk".to_string(),
            opening: Some(Decimal::from_str("2.5").unwrap()),
            closing: Some(Decimal::from_str("6.4").unwrap()),
            others: Some(Decimal::from_str("-1.5").unwrap()),
            rate: Some(Decimal::from_str("349.50").unwrap()),
            ..Default::default()
        };
        let row = build_row(&item, 750);

        assert_eq!(row.opening, 3);
        assert_eq!(row.closing, 6);
        assert_eq!(row.others, -2);
        assert_eq!(row.rate, Some(Decimal::from_str("349.50").unwrap()));
        assert_eq!(row.size_ml, 750);
    }

    #[test]
    fn test_rows_follow_items() {
        let items = vec![
            LineItem { brand_name: "A1".to_string(), ..Default::default() },
            LineItem { brand_name: "B2".to_string(), ..Default::default() },
        ];
        let rows = build_rows(&items, 750);

        assert_eq!(rows.len(), items.len());
        for (row, item) in rows.iter().zip(&items) {
            assert_eq!(row.brand_name, item.brand_name);
        }
    }

    #[test]
    fn test_out_of_range_count_is_clamped() {
        assert_eq!(count(Some(Decimal::MAX)), i64::MAX);
        assert_eq!(count(Some(Decimal::MIN)), i64::MIN);
        assert_eq!(count(Some(Decimal::from(i64::MAX))), i64::MAX);
        assert_eq!(count(None), 0);
    }
}
