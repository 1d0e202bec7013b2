//! Mapping a row's numeric tokens onto table columns.
//!
//! The right edge of a row (rate, sales amount) survives OCR best, while the
//! left edge is eaten into by the brand name. Templates therefore anchor on
//! the last token and count backwards; the number of tokens recognized picks
//! the template.

use rust_decimal::Decimal;

use crate::models::audit::LineItem;

/// Numeric columns of the stock table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Opening,
    Received,
    Total,
    Others,
    Closing,
    SalesQty,
    Rate,
    SalesAmount,
}

/// Column positions for rows with at least `min_tokens` numbers.
#[derive(Debug, Clone, Copy)]
pub struct ColumnTemplate {
    pub min_tokens: usize,
    /// `(column, offset)` where offset 1 is the last token.
    pub slots: &'static [(Column, usize)],
}

/// Templates ordered from widest to narrowest.
pub static COLUMN_TEMPLATES: &[ColumnTemplate] = &[
    ColumnTemplate {
        min_tokens: 8,
        slots: &[
            (Column::SalesAmount, 1),
            (Column::Rate, 2),
            (Column::SalesQty, 3),
            (Column::Closing, 4),
            (Column::Others, 5),
            (Column::Total, 6),
            (Column::Received, 7),
            (Column::Opening, 8),
        ],
    },
    ColumnTemplate {
        min_tokens: 7,
        slots: &[
            (Column::Rate, 1),
            (Column::SalesQty, 2),
            (Column::Closing, 3),
            (Column::Others, 4),
            (Column::Total, 5),
            (Column::Received, 6),
            (Column::Opening, 7),
        ],
    },
    ColumnTemplate {
        min_tokens: 6,
        slots: &[
            (Column::SalesQty, 1),
            (Column::Closing, 2),
            (Column::Others, 3),
            (Column::Total, 4),
            (Column::Received, 5),
            (Column::Opening, 6),
        ],
    },
    // Weakest branch: read the five tokens left to right.
    ColumnTemplate {
        min_tokens: 5,
        slots: &[
            (Column::Closing, 1),
            (Column::Others, 2),
            (Column::Total, 3),
            (Column::Received, 4),
            (Column::Opening, 5),
        ],
    },
];

/// Template used for a row with `count` numeric tokens.
pub fn template_for(count: usize) -> Option<&'static ColumnTemplate> {
    COLUMN_TEMPLATES.iter().find(|t| count >= t.min_tokens)
}

impl Column {
    fn slot(self, item: &mut LineItem) -> &mut Option<Decimal> {
        match self {
            Column::Opening => &mut item.opening,
            Column::Received => &mut item.received,
            Column::Total => &mut item.total,
            Column::Others => &mut item.others,
            Column::Closing => &mut item.closing,
            Column::SalesQty => &mut item.sales_qty,
            Column::Rate => &mut item.rate,
            Column::SalesAmount => &mut item.sales_amount,
        }
    }
}

/// Fill the numeric fields of `item` from `tokens`.
///
/// Returns `false`, leaving `item` untouched, when too few tokens were given
/// for any template.
pub fn map_columns(tokens: &[Decimal], item: &mut LineItem) -> bool {
    let Some(template) = template_for(tokens.len()) else {
        return false;
    };

    for &(column, offset) in template.slots {
        *column.slot(item) = tokens.len().checked_sub(offset).map(|i| tokens[i]);
    }

    true
}
