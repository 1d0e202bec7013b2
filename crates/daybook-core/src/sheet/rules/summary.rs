//! Summary totals printed below the stock table.
//!
//! Every field owns an ordered list of [`LabelMatcher`]s. The first matcher
//! that finds its label followed by a number wins; later ones are fallbacks
//! for the way OCR tends to mangle that label.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::dates::extract_audit_date;
use super::patterns::NUMBER_TOKEN;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::audit::AuditSummary;

/// Declarative description of a summary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatcher {
    /// Label words, matched case-insensitively with optional spacing between.
    pub words: &'static [&'static str],
    /// The last word may be wrapped in parentheses, as in "Cash (Night)".
    pub parenthesized_tail: bool,
    /// The last word is a stem and may continue with more letters.
    pub stem: bool,
    /// Reject the match when this word directly precedes the label.
    pub not_after: Option<&'static str>,
}

impl LabelMatcher {
    pub const fn phrase(words: &'static [&'static str]) -> Self {
        Self {
            words,
            parenthesized_tail: false,
            stem: false,
            not_after: None,
        }
    }

    pub const fn parenthesized(mut self) -> Self {
        self.parenthesized_tail = true;
        self
    }

    pub const fn stem(mut self) -> Self {
        self.stem = true;
        self
    }

    pub const fn not_after(mut self, word: &'static str) -> Self {
        self.not_after = Some(word);
        self
    }

    /// Compile to a regex whose first group is the first digit of the value.
    pub fn to_regex(&self) -> Result<Regex, regex::Error> {
        let mut pattern = String::from("(?i)");
        let last = self.words.len().saturating_sub(1);

        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                pattern.push_str(r"\s*");
            }
            let wrap = i == last && self.parenthesized_tail;
            if wrap {
                pattern.push_str(r"\(?\s*");
            }
            pattern.push_str(&regex::escape(word));
            if i == last && self.stem {
                pattern.push_str(r"\p{L}*");
            }
            if wrap {
                pattern.push_str(r"\s*\)?");
            }
        }

        pattern.push_str(r"\s*[:\-]?\s*(\d)");
        Regex::new(&pattern)
    }
}

/// The six monetary totals of a daily sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryField {
    OpeningBalance,
    TotalSales,
    OfficeCashNight,
    OfficeCashSheet,
    Expenditure,
    Balance,
}

const OPENING_BALANCE: &[LabelMatcher] = &[LabelMatcher::phrase(&["opening", "balance"])];

const TOTAL_SALES: &[LabelMatcher] = &[
    LabelMatcher::phrase(&["total", "sales"]),
    LabelMatcher::phrase(&["sales", "amount", "total"]),
];

const OFFICE_CASH_NIGHT: &[LabelMatcher] = &[
    LabelMatcher::phrase(&["office", "cash", "night"]).parenthesized(),
    LabelMatcher::phrase(&["office", "cash", "night"]),
];

const OFFICE_CASH_SHEET: &[LabelMatcher] = &[
    LabelMatcher::phrase(&["office", "cash", "sheet"]).parenthesized(),
    LabelMatcher::phrase(&["office", "cash", "sheet"]),
];

const EXPENDITURE: &[LabelMatcher] = &[LabelMatcher::phrase(&["expendit"]).stem()];

const BALANCE: &[LabelMatcher] = &[LabelMatcher::phrase(&["balance"]).not_after("opening")];

impl SummaryField {
    pub const ALL: [SummaryField; 6] = [
        SummaryField::OpeningBalance,
        SummaryField::TotalSales,
        SummaryField::OfficeCashNight,
        SummaryField::OfficeCashSheet,
        SummaryField::Expenditure,
        SummaryField::Balance,
    ];

    /// Label matchers in order of preference.
    pub fn matchers(self) -> &'static [LabelMatcher] {
        match self {
            SummaryField::OpeningBalance => OPENING_BALANCE,
            SummaryField::TotalSales => TOTAL_SALES,
            SummaryField::OfficeCashNight => OFFICE_CASH_NIGHT,
            SummaryField::OfficeCashSheet => OFFICE_CASH_SHEET,
            SummaryField::Expenditure => EXPENDITURE,
            SummaryField::Balance => BALANCE,
        }
    }

    /// Field name as it appears in the audit record.
    pub fn name(self) -> &'static str {
        match self {
            SummaryField::OpeningBalance => "openingBalance",
            SummaryField::TotalSales => "totalSales",
            SummaryField::OfficeCashNight => "officeCashNight",
            SummaryField::OfficeCashSheet => "officeCashSheet",
            SummaryField::Expenditure => "expenditure",
            SummaryField::Balance => "balance",
        }
    }

    fn compiled(self) -> &'static [CompiledLabel] {
        let idx = SummaryField::ALL
            .iter()
            .position(|f| *f == self)
            .unwrap_or_default();
        &COMPILED_LABELS[idx]
    }
}

struct CompiledLabel {
    regex: Regex,
    not_after: Option<&'static str>,
}

lazy_static! {
    static ref COMPILED_LABELS: Vec<Vec<CompiledLabel>> = SummaryField::ALL
        .iter()
        .map(|field| {
            field
                .matchers()
                .iter()
                .map(|m| CompiledLabel {
                    regex: m.to_regex().unwrap(),
                    not_after: m.not_after,
                })
                .collect()
        })
        .collect();
}

/// Extractor for one summary field.
pub struct SummaryExtractor {
    field: SummaryField,
}

impl SummaryExtractor {
    pub fn new(field: SummaryField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> SummaryField {
        self.field
    }

    fn matches_for(&self, label: &CompiledLabel, text: &str) -> Vec<ExtractionMatch<Decimal>> {
        let mut results = Vec::new();

        for caps in label.regex.captures_iter(text) {
            let (Some(full), Some(digit)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            if let Some(word) = label.not_after {
                let before = text[..full.start()].trim_end().to_lowercase();
                if before.ends_with(word) {
                    continue;
                }
            }

            let raw = scan_amount(&text[digit.start()..]);
            if let Some(amount) = parse_amount(raw) {
                let end = digit.start() + raw.len();
                results.push(
                    ExtractionMatch::new(amount, &text[full.start()..end])
                        .with_position(full.start(), end),
                );
            }
        }

        results
    }
}

impl FieldExtractor for SummaryExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.field
            .compiled()
            .iter()
            .find_map(|label| self.matches_for(label, text).into_iter().next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.field
            .compiled()
            .iter()
            .flat_map(|label| self.matches_for(label, text))
            .collect()
    }
}

/// Extract the audit date and the six declared totals.
///
/// `total_sales` here is the printed value only; reconciliation with the
/// row amounts happens later.
pub fn extract_summary(text: &str) -> AuditSummary {
    let value = |field| SummaryExtractor::new(field).extract(text).map(|m| m.value);

    AuditSummary {
        audit_date: extract_audit_date(text),
        opening_balance: value(SummaryField::OpeningBalance),
        total_sales: value(SummaryField::TotalSales),
        office_cash_night: value(SummaryField::OfficeCashNight),
        office_cash_sheet: value(SummaryField::OfficeCashSheet),
        expenditure: value(SummaryField::Expenditure),
        balance: value(SummaryField::Balance),
    }
}

/// Take the amount-shaped prefix of `s`: digits, separators, and a letter
/// "O" where it sits next to digits.
fn scan_amount(s: &str) -> &str {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut end = 0;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p].1);
        let next = chars.get(i + 1).map(|&(_, n)| n);

        let accept = match c {
            '0'..='9' => true,
            ',' | '.' | ' ' | '-' => true,
            'O' | 'o' => {
                let after_digit = prev.is_some_and(|p| p.is_ascii_digit() || p == 'O' || p == 'o');
                let before_word = next.is_some_and(|n| n.is_alphabetic() && n != 'O' && n != 'o');
                after_digit && !before_word
            }
            _ => false,
        };

        if !accept {
            break;
        }
        end = pos + c.len_utf8();
    }

    &s[..end]
}

/// Parse an OCR'd amount such as "1,2O0" or "12 500.50".
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .map(|c| if c == 'O' || c == 'o' { '0' } else { c })
        .collect();

    let token = NUMBER_TOKEN.find(&cleaned)?;
    Decimal::from_str(token.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,2O0"), Some(dec("1200")));
        assert_eq!(parse_amount("12 500.50"), Some(dec("12500.50")));
        assert_eq!(parse_amount("1,00,000"), Some(dec("100000")));
        assert_eq!(parse_amount("-350"), Some(dec("-350")));
        assert_eq!(parse_amount(" , . "), None);
    }

    #[test]
    fn test_label_regex_shapes() {
        let re = LabelMatcher::phrase(&["office", "cash", "night"])
            .parenthesized()
            .to_regex()
            .unwrap();
        assert!(re.is_match("Office Cash (Night): 500"));
        assert!(re.is_match("OFFICE CASH NIGHT - 500"));
        assert!(re.is_match("OfficeCash(Night)500"));

        let re = LabelMatcher::phrase(&["expendit"]).stem().to_regex().unwrap();
        assert!(re.is_match("Expenditure: 300"));
        assert!(re.is_match("Expendit 300"));
        let caps = re.captures("Expenditure500").unwrap();
        assert_eq!(caps.get(1).unwrap().start(), "Expenditure".len());
    }

    #[test]
    fn test_opening_balance_with_letter_o() {
        let m = SummaryExtractor::new(SummaryField::OpeningBalance)
            .extract("Opening Balance: 1,2O0")
            .unwrap();
        assert_eq!(m.value, dec("1200"));
        assert_eq!(m.source, "Opening Balance: 1,2O0");
    }

    #[test]
    fn test_value_stops_before_next_label() {
        let text = "Opening Balance 1200 Office Cash (Night) 500";
        let summary = extract_summary(text);
        assert_eq!(summary.opening_balance, Some(dec("1200")));
        assert_eq!(summary.office_cash_night, Some(dec("500")));
    }

    #[test]
    fn test_balance_ignores_opening_balance() {
        let text = "Opening Balance: 1200\nBalance: 4500";
        let summary = extract_summary(text);
        assert_eq!(summary.opening_balance, Some(dec("1200")));
        assert_eq!(summary.balance, Some(dec("4500")));
    }

    #[test]
    fn test_balance_absent_when_only_opening_balance() {
        let summary = extract_summary("Opening Balance: 1200");
        assert_eq!(summary.balance, None);
    }

    #[test]
    fn test_total_sales_fallback_label() {
        let summary = extract_summary("Sales Amount Total: 48,000");
        assert_eq!(summary.total_sales, Some(dec("48000")));

        let summary = extract_summary("Total Sales - 50000\nSales Amount Total: 48000");
        assert_eq!(summary.total_sales, Some(dec("50000")));
    }

    #[test]
    fn test_office_cash_sheet_variants() {
        assert_eq!(
            extract_summary("Office Cash (Sheet) : 7,500").office_cash_sheet,
            Some(dec("7500"))
        );
        assert_eq!(
            extract_summary("office cash sheet 7500").office_cash_sheet,
            Some(dec("7500"))
        );
    }

    #[test]
    fn test_label_without_value_is_absent() {
        let summary = extract_summary("Expenditure:\nNotes");
        assert_eq!(summary.expenditure, None);
    }

    #[test]
    fn test_extract_summary_full() {
        let text = "Date: 07/08/24\nOpening Balance: 10,000\nTotal Sales: 50,000\n\
                    Office Cash (Night): 20,000\nOffice Cash (Sheet): 19,500\n\
                    Expenditure: 500\nBalance: 39,500";
        let summary = extract_summary(text);

        assert_eq!(summary.audit_date, NaiveDate::from_ymd_opt(2024, 8, 7));
        assert_eq!(summary.opening_balance, Some(dec("10000")));
        assert_eq!(summary.total_sales, Some(dec("50000")));
        assert_eq!(summary.office_cash_night, Some(dec("20000")));
        assert_eq!(summary.office_cash_sheet, Some(dec("19500")));
        assert_eq!(summary.expenditure, Some(dec("500")));
        assert_eq!(summary.balance, Some(dec("39500")));
    }

    #[test]
    fn test_extract_all_lists_every_occurrence() {
        let text = "Total Sales: 100\nTotal Sales: 200";
        let all = SummaryExtractor::new(SummaryField::TotalSales).extract_all(text);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].value, dec("200"));
    }
}
