//! Merging a newly extracted column into a previously loaded row set.
//!
//! Operators often load a full sheet once and then upload a second scan
//! that only carries a better reading of one column. Rows are matched by
//! normalized brand name, optionally together with bottle size.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::audit::{ParsedAudit, Row};

/// Column taken from the incoming rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeField {
    SalesAmount,
    SalesQty,
}

/// How rows are matched between the two sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeKey {
    #[default]
    Brand,
    BrandAndSize,
}

/// Case-insensitive brand key with whitespace collapsed.
pub fn brand_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn row_key(row: &Row, key: MergeKey) -> (String, Option<u32>) {
    match key {
        MergeKey::Brand => (brand_key(&row.brand_name), None),
        MergeKey::BrandAndSize => (brand_key(&row.brand_name), Some(row.size_ml)),
    }
}

/// Copy `field` from matching `incoming` rows onto `existing`.
///
/// Existing rows without a match are returned unchanged, and an absent
/// incoming sales amount never clears a present one. When several incoming
/// rows share a key the last one wins. Row counts are always present, so a
/// sales quantity is taken as is; use [`merge_audit`] to skip quantities the
/// incoming scan did not actually read.
pub fn merge_rows(existing: &[Row], incoming: &[Row], field: MergeField, key: MergeKey) -> Vec<Row> {
    merge_matched(existing, incoming.iter().map(|r| (r, true)), field, key)
}

/// Rows paired with whether their sales quantity was read.
fn merge_matched<'a>(
    existing: &[Row],
    incoming: impl IntoIterator<Item = (&'a Row, bool)>,
    field: MergeField,
    key: MergeKey,
) -> Vec<Row> {
    let by_key: HashMap<_, (&Row, bool)> = incoming
        .into_iter()
        .map(|(r, has_qty)| (row_key(r, key), (r, has_qty)))
        .collect();

    existing
        .iter()
        .map(|row| {
            let Some(&(newer, has_qty)) = by_key.get(&row_key(row, key)) else {
                return row.clone();
            };

            let mut merged = row.clone();
            match field {
                MergeField::SalesAmount => {
                    merged.sales_amount = newer.sales_amount.or(row.sales_amount);
                }
                MergeField::SalesQty if has_qty => {
                    merged.sales_qty = newer.sales_qty;
                }
                MergeField::SalesQty => {}
            }
            merged
        })
        .collect()
}

/// Merge the rows of `incoming` into `audit`, keeping its line items in step.
///
/// A sales quantity missing from the incoming line item is treated as
/// absent rather than as the zero its row carries. Returns how many rows
/// changed.
pub fn merge_audit(audit: &mut ParsedAudit, incoming: &ParsedAudit, field: MergeField, key: MergeKey) -> usize {
    let pairs = incoming.rows.iter().enumerate().map(|(i, row)| {
        let has_qty = incoming
            .line_items
            .get(i)
            .map_or(true, |item| item.sales_qty.is_some());
        (row, has_qty)
    });

    let merged = merge_matched(&audit.rows, pairs, field, key);
    let mut changed = 0;

    for (i, (old, new)) in audit.rows.iter().zip(&merged).enumerate() {
        if old == new {
            continue;
        }
        changed += 1;

        if let Some(item) = audit.line_items.get_mut(i) {
            match field {
                MergeField::SalesAmount => item.sales_amount = new.sales_amount,
                MergeField::SalesQty => item.sales_qty = Some(Decimal::from(new.sales_qty)),
            }
        }
    }

    audit.rows = merged;
    changed
}
