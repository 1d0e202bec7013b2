//! Core library for daily store sheet audits.
//!
//! This crate provides:
//! - PDF text layer access
//! - Normalization of OCR or text-layer output
//! - Extraction of summary totals, the audit date and the per-brand stock table
//! - Reconciliation of declared and computed sales, and column merges

pub mod error;
pub mod models;
pub mod pdf;
pub mod sheet;

pub use error::{DaybookError, PdfError, Result};
pub use models::audit::{AuditSummary, LineItem, ParsedAudit, Row};
pub use models::config::DaybookConfig;
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
pub use sheet::{
    merge_audit, merge_rows, parse_daily_sheet, DailySheetParser, ExtractionResult, MergeField, MergeKey,
    SheetParser, TotalSource,
};
