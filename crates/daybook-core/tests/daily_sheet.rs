//! Whole-document extraction tests.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use daybook_core::models::config::ExtractionConfig;
use daybook_core::sheet::{
    merge_audit, merge_rows, parse_daily_sheet, DailySheetParser, MergeField, MergeKey, SheetParser,
    TotalSource,
};

fn d(v: i64) -> Option<Decimal> {
    Some(Decimal::from(v))
}

/// A sheet as it comes out of OCR: pipes, tabs, CRLF line ends and stray
/// single letters between rows.
const OCR_SHEET: &str = "DAILY SHEET\r\nName of the shop : Lakshmi Wines\r\nDate: 12-03-2025\r\n\
Sl. No\t| Brand Name |\tO.B | Received | Total | Others | C.B | Sales | Rate | Sales Amount\r\n\
1 | Royal Stag | 10 | 2 | 12 | 0 | 6 | 6 | 3500 | 21000\r\n\
N\r\n\
2 | Imperial Blue 375ml | 20 | 0 | 20 | 0 | 15 | 5 | 400 | 2000\r\n\
Kingfisher Strong | 24 | 12 | 36 | 0 | 30 | 6 | 150\r\n\
Bagpiper | 8 | 0 | 8 | 0 | 8\r\n\
P\r\n\
Total Sales : 23,500\r\n\
Office Cash Night 20000\r\n\
Office Cash Sheet 19,800\r\n\
Expenditre: 300\r\n\
Balance - 3,400\r\n\
Signature\r\n";

#[test]
fn test_ocr_sheet_end_to_end() {
    let result = DailySheetParser::new().parse(OCR_SHEET);
    let audit = &result.audit;

    assert_eq!(audit.summary.audit_date, NaiveDate::from_ymd_opt(2025, 3, 12));
    assert_eq!(audit.summary.opening_balance, None);
    assert_eq!(audit.summary.total_sales, d(23500));
    assert_eq!(audit.summary.office_cash_night, d(20000));
    assert_eq!(audit.summary.office_cash_sheet, d(19800));
    assert_eq!(audit.summary.expenditure, d(300));
    assert_eq!(audit.summary.balance, d(3400));

    let brands: Vec<_> = audit.rows.iter().map(|r| r.brand_name.as_str()).collect();
    assert_eq!(
        brands,
        ["Royal Stag", "Imperial Blue 375ml", "Kingfisher Strong", "Bagpiper"]
    );

    // 7 numbers: rate present, amount missing
    let kingfisher = &audit.line_items[2];
    assert_eq!(kingfisher.rate, d(150));
    assert_eq!(kingfisher.sales_amount, None);
    assert_eq!(kingfisher.opening, d(24));

    // 5 numbers: forward order, sales left at zero in the row
    let bagpiper = &audit.rows[3];
    assert_eq!(bagpiper.opening, 8);
    assert_eq!(bagpiper.closing, 8);
    assert_eq!(bagpiper.sales_qty, 0);
    assert_eq!(bagpiper.rate, None);

    assert_eq!(audit.rows[1].size_ml, 375);
    assert_eq!(audit.rows[0].size_ml, 750);

    assert_eq!(result.total_sales.source, TotalSource::Declared);
    assert_eq!(result.total_sales.computed, Decimal::from(23000));
}

#[test]
fn test_rows_mirror_line_items() {
    let audit = parse_daily_sheet(OCR_SHEET);

    assert_eq!(audit.rows.len(), audit.line_items.len());
    for (row, item) in audit.rows.iter().zip(&audit.line_items) {
        assert_eq!(row.brand_name, item.brand_name);
        assert_eq!(row.rate, item.rate);
        assert_eq!(row.sales_amount, item.sales_amount);
        assert_eq!(Some(Decimal::from(row.opening)), item.opening.or(d(0)));
        assert_eq!(Some(row.size_ml), item.size_ml);
    }
}

#[test]
fn test_extraction_is_deterministic() {
    assert_eq!(parse_daily_sheet(OCR_SHEET), parse_daily_sheet(OCR_SHEET));
}

#[test]
fn test_json_contract() {
    let audit = parse_daily_sheet(OCR_SHEET);
    let json = serde_json::to_value(&audit).unwrap();

    assert_eq!(json["auditDate"], "2025-03-12");
    assert_eq!(json["totalSales"], "23500");
    assert!(json.get("openingBalance").is_none());
    assert_eq!(json["rows"][0]["brandName"], "Royal Stag");
    assert_eq!(json["rows"][0]["salesQty"], 6);
    assert_eq!(json["lineItems"][3]["closing"], "8");
    assert!(json["lineItems"][3].get("salesQty").is_none());
    assert!(json["rawText"].as_str().unwrap().starts_with("DAILY SHEET"));
}

#[test]
fn test_headerless_text() {
    let text = "Royal Stag 10 2 12 0 6 6 3500 21000\nOld Monk 10 2 12 0 6 6 4500 27000\nN\n";
    let result = DailySheetParser::new().parse(text);

    assert_eq!(result.header, None);
    assert_eq!(result.audit.rows.len(), 2);
    assert_eq!(result.audit.summary.total_sales, d(48000));
    assert_eq!(result.total_sales.source, TotalSource::Computed);
}

#[test]
fn test_configured_minimum_columns() {
    assert_eq!(parse_daily_sheet(OCR_SHEET).rows.len(), 4);

    let config = ExtractionConfig {
        min_numeric_tokens: 6,
        ..Default::default()
    };
    let strict = DailySheetParser::from_config(&config).parse_audit(OCR_SHEET);

    let brands: Vec<_> = strict.rows.iter().map(|r| r.brand_name.as_str()).collect();
    assert_eq!(brands, ["Royal Stag", "Imperial Blue 375ml", "Kingfisher Strong"]);
}

#[test]
fn test_rescan_merge() {
    let loaded = parse_daily_sheet(OCR_SHEET);
    let rescan = parse_daily_sheet(
        "Brand Name O.B Received Total Others C.B Sales Rate Sales Amount\n\
         KINGFISHER  STRONG 24 12 36 0 30 6 150 900",
    );

    let merged = merge_rows(&loaded.rows, &rescan.rows, MergeField::SalesAmount, MergeKey::Brand);

    assert_eq!(merged[2].sales_amount, d(900));
    assert_eq!(merged[0], loaded.rows[0]);
    assert_eq!(merged.len(), loaded.rows.len());
}

#[test]
fn test_bare_volume_is_read_as_a_column() {
    let audit = parse_daily_sheet("Imperial Blue 375 20 0 20 0 15 5 400 2000\n");

    assert_eq!(audit.rows[0].brand_name, "Imperial Blue");
    assert_eq!(audit.rows[0].size_ml, 750);
    assert_eq!(audit.rows[0].opening, 20);
    assert_eq!(audit.rows[0].sales_amount, d(2000));
}

#[test]
fn test_rescan_without_sales_column_keeps_quantity() {
    let mut audit = parse_daily_sheet("Royal Stag 10 2 12 0 6 6 3500 21000\n");
    let rescan = parse_daily_sheet("Royal Stag 10 2 12 0 6\n");
    assert_eq!(rescan.line_items[0].sales_qty, None);

    let changed = merge_audit(&mut audit, &rescan, MergeField::SalesQty, MergeKey::Brand);

    assert_eq!(changed, 0);
    assert_eq!(audit.rows[0].sales_qty, 6);
    assert_eq!(audit.line_items[0].sales_qty, d(6));
}
