//! Daily sheet extraction.
//!
//! Raw text goes through normalization, summary extraction, header location,
//! row parsing, row building and total reconciliation, in that order. Every
//! stage is a pure function of its input.

mod build;
pub mod merge;
mod normalize;
mod parser;
pub mod reconcile;
pub mod rules;

pub use build::{build_row, build_rows};
pub use merge::{brand_key, merge_audit, merge_rows, MergeField, MergeKey};
pub use normalize::{normalize, NormalizedText};
pub use parser::{parse_daily_sheet, DailySheetParser, ExtractionResult, SheetParser};
pub use reconcile::{reconcile_total_sales, TotalSales, TotalSource};
