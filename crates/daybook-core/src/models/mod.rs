//! Data models for audits and configuration.

pub mod audit;
pub mod config;

pub use audit::{AuditSummary, LineItem, ParsedAudit, Row, DEFAULT_SIZE_ML};
pub use config::{DaybookConfig, ExtractionConfig, OutputConfig, PdfConfig};
