//! Audit date extraction.

use chrono::NaiveDate;

use super::patterns::DATE_DMY;
use super::{ExtractionMatch, FieldExtractor};

/// Date extractor for `DD/MM/YY(YY)` and `DD-MM-YY(YY)` tokens.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    /// Only the first date-shaped token counts. If it is not a real calendar
    /// date the result is `None`; later tokens are not consulted.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = DATE_DMY.captures(text)?;
        let full = caps.get(0)?;
        let date = to_date(&caps[1], &caps[2], &caps[3])?;

        Some(ExtractionMatch::new(date, full.as_str()).with_position(full.start(), full.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_DMY
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let date = to_date(&caps[1], &caps[2], &caps[3])?;
                Some(ExtractionMatch::new(date, full.as_str()).with_position(full.start(), full.end()))
            })
            .collect()
    }
}

/// Audit date of a sheet: the first date token in the text.
pub fn extract_audit_date(text: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

fn to_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year = parse_year(year)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years belong to this century.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        Some(2000 + year)
    } else {
        Some(year)
    }
}
