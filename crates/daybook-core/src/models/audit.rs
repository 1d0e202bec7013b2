//! Audit record models produced from a daily sheet.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bottle size assumed when the brand text carries no recognizable volume.
pub const DEFAULT_SIZE_ML: u32 = 750;

/// One brand's raw extracted values, before defaulting.
///
/// `None` means the value was not confidently recognized, which is distinct
/// from a recognized zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Cleaned brand name.
    pub brand_name: String,

    /// Bottle size in milliliters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_ml: Option<u32>,

    /// Opening stock (O.B).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<Decimal>,

    /// Stock received during the day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<Decimal>,

    /// Opening plus received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    /// Transfers, breakage and other adjustments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub others: Option<Decimal>,

    /// Closing stock (C.B).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<Decimal>,

    /// Units sold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_qty: Option<Decimal>,

    /// Unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,

    /// Sales amount for the row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_amount: Option<Decimal>,
}

/// Display-ready row derived from a [`LineItem`].
///
/// Stock counts are always present; money stays optional so that a missing
/// amount is never shown as a false zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub brand_name: String,
    pub size_ml: u32,
    pub opening: i64,
    pub received: i64,
    pub total: i64,
    pub others: i64,
    pub closing: i64,
    pub sales_qty: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_amount: Option<Decimal>,
}

/// Document-level totals and the audit date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    /// Ledger date, serialized as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<Decimal>,

    /// Declared total, or the computed row sum when none was declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_cash_night: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_cash_sheet: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenditure: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
}

impl AuditSummary {
    /// Names of the monetary fields that were not recognized.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("openingBalance", &self.opening_balance),
            ("totalSales", &self.total_sales),
            ("officeCashNight", &self.office_cash_night),
            ("officeCashSheet", &self.office_cash_sheet),
            ("expenditure", &self.expenditure),
            ("balance", &self.balance),
        ];

        fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Complete extraction result for one daily sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAudit {
    /// Summary fields, flattened into the top-level record.
    #[serde(flatten)]
    pub summary: AuditSummary,

    /// Raw line items in document order.
    pub line_items: Vec<LineItem>,

    /// Defaulted rows, one per line item, same order.
    pub rows: Vec<Row>,

    /// The text the audit was extracted from.
    pub raw_text: String,
}

impl ParsedAudit {
    /// Replace the extracted audit date, e.g. with one picked by an operator.
    pub fn with_audit_date(mut self, date: NaiveDate) -> Self {
        self.summary.audit_date = Some(date);
        self
    }

    /// True when no table rows were recognized.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the sales amounts present on the line items.
    pub fn computed_total_sales(&self) -> Decimal {
        self.line_items.iter().filter_map(|i| i.sales_amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_audit() -> ParsedAudit {
        ParsedAudit {
            summary: AuditSummary {
                audit_date: NaiveDate::from_ymd_opt(2024, 8, 7),
                opening_balance: Some(Decimal::new(1200, 0)),
                ..Default::default()
            },
            line_items: vec![LineItem {
                brand_name: "Royal Stag".to_string(),
                size_ml: Some(750),
                sales_amount: Some(Decimal::new(21000, 0)),
                ..Default::default()
            }],
            rows: vec![Row {
                brand_name: "Royal Stag".to_string(),
                size_ml: 750,
                opening: 0,
                received: 0,
                total: 0,
                others: 0,
                closing: 0,
                sales_qty: 0,
                rate: None,
                sales_amount: Some(Decimal::new(21000, 0)),
            }],
            raw_text: String::new(),
        }
    }

    #[test]
    fn test_serializes_camel_case_flattened() {
        let json = serde_json::to_value(sample_audit()).unwrap();

        assert_eq!(json["auditDate"], "2024-08-07");
        assert!(json.get("openingBalance").is_some());
        assert!(json.get("balance").is_none());
        assert_eq!(json["rows"][0]["brandName"], "Royal Stag");
        assert_eq!(json["rows"][0]["sizeMl"], 750);
        assert!(json["rows"][0].get("rate").is_none());
    }

    #[test]
    fn test_json_roundtrip_keeps_record() {
        let audit = sample_audit();
        let json = serde_json::to_string(&audit).unwrap();
        let back: ParsedAudit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, audit);
    }

    #[test]
    fn test_with_audit_date_overrides() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let audit = sample_audit().with_audit_date(date);
        assert_eq!(audit.summary.audit_date, Some(date));
    }

    #[test]
    fn test_missing_fields() {
        let missing = sample_audit().summary.missing_fields();
        assert_eq!(
            missing,
            vec!["totalSales", "officeCashNight", "officeCashSheet", "expenditure", "balance"]
        );
    }

    #[test]
    fn test_computed_total_sales() {
        assert_eq!(sample_audit().computed_total_sales(), Decimal::new(21000, 0));
    }
}
