//! Daily sheet parser tying the extraction stages together.

use tracing::{debug, info, warn};

use crate::models::audit::ParsedAudit;
use crate::models::config::ExtractionConfig;

use super::build::build_rows;
use super::normalize::normalize;
use super::reconcile::{reconcile_total_sales, TotalSales};
use super::rules::{extract_summary, locate_header, HeaderMatch, RowParser};

/// Result of daily sheet extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Extracted audit record.
    pub audit: ParsedAudit,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Table header, if one was found.
    pub header: Option<HeaderMatch>,
    /// How the final total sales figure was obtained.
    pub total_sales: TotalSales,
}

/// Trait for daily sheet parsing.
///
/// Parsing never fails: anything that cannot be recognized is left absent.
pub trait SheetParser {
    /// Parse a sheet with diagnostics.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Parse a sheet, keeping only the audit record.
    fn parse_audit(&self, text: &str) -> ParsedAudit {
        self.parse(text).audit
    }
}

/// Rule-based parser for the fixed daily sheet layout.
#[derive(Debug, Clone, Default)]
pub struct DailySheetParser {
    rows: RowParser,
    default_size_ml: u32,
}

impl DailySheetParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            rows: RowParser::from_config(config),
            default_size_ml: config.default_size_ml,
        }
    }
}

impl SheetParser for DailySheetParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let mut warnings = Vec::new();

        let normalized = normalize(text);
        info!("Parsing daily sheet from {} lines of text", normalized.lines().len());

        let mut summary = extract_summary(&normalized.text());
        if summary.audit_date.is_none() {
            warnings.push("Could not extract audit date".to_string());
        }

        let header = locate_header(normalized.lines());
        let start = match header {
            Some(h) => {
                debug!("Table header at line {} ({:?})", h.line, h.kind);
                h.data_start()
            }
            None => {
                warnings.push("No table header found; scanning every line".to_string());
                0
            }
        };

        let outcome = self.rows.parse_rows(normalized.lines(), start);
        debug!(
            "Parsed {} rows, rejected {} lines",
            outcome.items.len(),
            outcome.rejected
        );
        if outcome.items.is_empty() {
            warnings.push("Could not extract any table rows".to_string());
        }

        let total_sales = reconcile_total_sales(summary.total_sales, &outcome.items);
        summary.total_sales = total_sales.value;
        if let Some(diff) = total_sales.mismatch() {
            warn!("Declared total sales differs from row sum by {}", diff);
            warnings.push(format!(
                "Declared total sales differs from row sum {} by {}",
                total_sales.computed, diff
            ));
        }

        for field in summary.missing_fields() {
            warnings.push(format!("Could not extract {}", field));
        }

        let rows = build_rows(&outcome.items, self.default_size_ml);

        ExtractionResult {
            audit: ParsedAudit {
                summary,
                line_items: outcome.items,
                rows,
                raw_text: text.to_string(),
            },
            warnings,
            header,
            total_sales,
        }
    }
}

/// Parse a daily sheet with default settings.
pub fn parse_daily_sheet(text: &str) -> ParsedAudit {
    DailySheetParser::new().parse_audit(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::reconcile::TotalSource;
    use crate::sheet::rules::HeaderKind;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const SHEET: &str = "\
DAILY SHEET        Date: 07/08/24
Name of the shop: Sri Wines
Sl. No | Brand Name | O.B | Received | Total | Others | C.B | Sales | Rate | Sales Amount
1 | Royal Stag 750ml | 10 | 2 | 12 | 0 | 6 | 6 | 3500 | 21000
Q
2 | Old Monk 180ml | 40 | 0 | 40 | 0 | 30 | 10 | 120 | 1200
Kingfisher Strong | 24 | 0 | 24 | 0 | 20 | 4
Opening Balance: 1,2O0
Total Sales: 23000
Office Cash (Night): 5000
Office Cash (Sheet) - 4800
Expenditure 200
Balance: 19000
4 | Signature 10 2 12 0 6 6 900 5400
";

    fn d(v: i64) -> Option<Decimal> {
        Some(Decimal::from(v))
    }

    #[test]
    fn test_parse_full_sheet() {
        let result = DailySheetParser::new().parse(SHEET);
        let audit = &result.audit;

        assert_eq!(result.header.map(|h| h.kind), Some(HeaderKind::Strict));
        assert_eq!(audit.summary.audit_date, NaiveDate::from_ymd_opt(2024, 8, 7));
        assert_eq!(audit.summary.opening_balance, d(1200));
        assert_eq!(audit.summary.total_sales, d(23000));
        assert_eq!(audit.summary.office_cash_night, d(5000));
        assert_eq!(audit.summary.office_cash_sheet, d(4800));
        assert_eq!(audit.summary.expenditure, d(200));
        assert_eq!(audit.summary.balance, d(19000));

        let brands: Vec<_> = audit.rows.iter().map(|r| r.brand_name.as_str()).collect();
        assert_eq!(brands, ["Royal Stag 750ml", "Old Monk 180ml", "Kingfisher Strong"]);
        assert_eq!(audit.rows.len(), audit.line_items.len());

        assert_eq!(audit.rows[1].size_ml, 180);
        assert_eq!(audit.rows[1].sales_amount, d(1200));
        assert_eq!(audit.rows[2].size_ml, 750);
        assert_eq!(audit.rows[2].sales_qty, 4);
        assert_eq!(audit.rows[2].rate, None);

        assert_eq!(result.total_sales.source, TotalSource::Declared);
        assert_eq!(result.total_sales.computed, Decimal::from(22200));
        assert!(result.warnings.iter().any(|w| w.contains("differs")));
        assert_eq!(audit.raw_text, SHEET);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = DailySheetParser::new();
        assert_eq!(parser.parse(SHEET), parser.parse(SHEET));
    }

    #[test]
    fn test_rows_stop_at_summary_section() {
        let text = "Brand Name O.B Received Total Others C.B Sales Rate Sales Amount\n\
                    Royal Stag 10 2 12 0 6 6 3500 21000\n\
                    Opening Balance 10000\n\
                    Old Monk 10 2 12 0 6 6 300 1800";
        let audit = parse_daily_sheet(text);

        assert_eq!(audit.rows.len(), 1);
        assert_eq!(audit.rows[0].brand_name, "Royal Stag");
        assert_eq!(audit.summary.opening_balance, d(10000));
    }

    #[test]
    fn test_computed_total_fallback() {
        let text = "Brand Name O.B Received Total Others C.B Sales Rate Sales Amount\n\
                    Royal Stag 10 2 12 0 6 6 3500 21000\n\
                    Old Monk 10 2 12 0 6 6 4500 27000";
        let result = DailySheetParser::new().parse(text);

        assert_eq!(result.audit.summary.total_sales, d(48000));
        assert_eq!(result.total_sales.source, TotalSource::Computed);
    }

    #[test]
    fn test_no_header_degraded_mode() {
        let text = "Q\nP\nRoyal Stag 10 2 12 0 6 6 3500 21000\nshop 4 road 12";
        let result = DailySheetParser::new().parse(text);

        assert_eq!(result.header, None);
        assert_eq!(result.audit.rows.len(), 1);
        assert!(result.warnings.iter().any(|w| w.contains("No table header")));
    }

    #[test]
    fn test_degenerate_input() {
        let result = DailySheetParser::new().parse("   \n\t\n");

        assert!(result.audit.is_empty());
        assert_eq!(result.audit.summary.total_sales, None);
        assert_eq!(result.total_sales.source, TotalSource::Absent);
        assert!(result.warnings.iter().any(|w| w.contains("table rows")));
        assert!(result.warnings.iter().any(|w| w.contains("openingBalance")));
    }

    #[test]
    fn test_configured_default_size() {
        let config = ExtractionConfig {
            default_size_ml: 375,
            ..Default::default()
        };
        let audit = DailySheetParser::from_config(&config)
            .parse_audit("Royal Stag 10 2 12 0 6 6 3500 21000");
        assert_eq!(audit.rows[0].size_ml, 375);
    }
}
