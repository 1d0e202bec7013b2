//! Stock table row parsing.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, trace};

use super::brand::{clean_brand, infer_size_ml, split_brand};
use super::columns::map_columns;
use super::noise::{classify_line, LineClass};
use super::patterns::NUMBER_TOKEN;
use crate::models::audit::LineItem;
use crate::models::config::ExtractionConfig;

/// Rows read from the table plus where reading stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowParseOutcome {
    /// Accepted rows in document order.
    pub items: Vec<LineItem>,
    /// Candidate lines that were not accepted as rows.
    pub rejected: usize,
    /// Line index of the summary or footer marker that ended the table.
    pub terminated_at: Option<usize>,
}

/// Parser turning table lines into [`LineItem`]s.
#[derive(Debug, Clone)]
pub struct RowParser {
    min_numeric_tokens: usize,
    min_brand_len: usize,
    default_size_ml: u32,
    extra_noise_tokens: Vec<String>,
}

impl RowParser {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_numeric_tokens: config.min_numeric_tokens,
            min_brand_len: config.min_brand_len,
            default_size_ml: config.default_size_ml,
            extra_noise_tokens: config.extra_noise_tokens.clone(),
        }
    }

    /// Parse rows from `lines[start..]` until the table ends.
    pub fn parse_rows<S: AsRef<str>>(&self, lines: &[S], start: usize) -> RowParseOutcome {
        let mut outcome = RowParseOutcome::default();

        for (idx, line) in lines.iter().enumerate().skip(start) {
            let line = line.as_ref();

            match classify_line(line, &self.extra_noise_tokens) {
                LineClass::Noise => continue,
                LineClass::Terminator => {
                    debug!("Table ends at line {}: {:?}", idx, line);
                    outcome.terminated_at = Some(idx);
                    break;
                }
                LineClass::Candidate => {}
            }

            match self.parse_line(line) {
                Some(item) => outcome.items.push(item),
                None => {
                    trace!("Rejected line {}: {:?}", idx, line);
                    outcome.rejected += 1;
                }
            }
        }

        outcome
    }

    /// Parse a single candidate line into a row.
    pub fn parse_line(&self, line: &str) -> Option<LineItem> {
        let line = line.trim();

        let mut spans = Vec::new();
        let mut tokens = Vec::new();
        for m in NUMBER_TOKEN.find_iter(line) {
            // Runs too long for a Decimal are not stock figures.
            let value = Decimal::from_str(m.as_str()).ok()?;
            spans.push((m.start(), m.end()));
            tokens.push(value);
        }

        if tokens.len() < self.min_numeric_tokens {
            return None;
        }

        let candidate = split_brand(line, &spans, self.min_numeric_tokens);
        if candidate.chars().count() < self.min_brand_len {
            return None;
        }

        let brand_name = clean_brand(candidate);
        if brand_name.is_empty() {
            return None;
        }

        let size_ml = infer_size_ml(&brand_name).unwrap_or(self.default_size_ml);

        let mut item = LineItem {
            brand_name,
            size_ml: Some(size_ml),
            ..Default::default()
        };

        if !map_columns(&tokens, &mut item) {
            return None;
        }

        Some(item)
    }
}

impl Default for RowParser {
    fn default() -> Self {
        Self::new()
    }
}
