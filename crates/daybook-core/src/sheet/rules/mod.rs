//! Rule-based field extractors for daily sheets.

pub mod brand;
pub mod columns;
pub mod dates;
pub mod noise;
pub mod patterns;
pub mod rows;
pub mod summary;
pub mod table;

pub use brand::{clean_brand, infer_size_ml, split_brand};
pub use columns::{Column, ColumnTemplate, COLUMN_TEMPLATES, map_columns, template_for};
pub use dates::{extract_audit_date, DateExtractor};
pub use noise::{classify_line, LineClass, NOISE_TOKENS};
pub use rows::{RowParseOutcome, RowParser};
pub use summary::{extract_summary, parse_amount, LabelMatcher, SummaryExtractor, SummaryField};
pub use table::{locate_header, HeaderKind, HeaderMatch};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in the text together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
