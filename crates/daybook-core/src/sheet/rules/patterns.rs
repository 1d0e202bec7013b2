//! Common regex patterns for daily sheet extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric token: optional sign, digits, optional decimal part
    pub static ref NUMBER_TOKEN: Regex = Regex::new(
        r"-?\d+(?:\.\d+)?"
    ).unwrap();

    // Day/month/year with a 2-4 digit year
    pub static ref DATE_DMY: Regex = Regex::new(
        r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})"
    ).unwrap();

    // Column header, every column present in any order
    pub static ref HEADER_BRAND: Regex = Regex::new(r"(?i)brand\s*name").unwrap();
    pub static ref HEADER_OB: Regex = Regex::new(r"(?i)\bO\s*\.?\s*B\b").unwrap();
    pub static ref HEADER_RECEIVED: Regex = Regex::new(r"(?i)received").unwrap();
    pub static ref HEADER_CB: Regex = Regex::new(r"(?i)\bC\s*\.?\s*B\b").unwrap();
    pub static ref HEADER_SALES: Regex = Regex::new(r"(?i)sales").unwrap();

    // Column header, columns in textual order
    pub static ref HEADER_LOOSE: Regex = Regex::new(
        r"(?i)brand\s*name.*?O\s*\.?\s*B.*?received.*?total.*?C\s*\.?\s*B.*?sales.*?sales\s*amount"
    ).unwrap();

    // Header and title fragments that are never table rows
    pub static ref HEADER_FRAGMENTS: Vec<Regex> = vec![
        Regex::new(r"(?i)daily\s*sheet").unwrap(),
        Regex::new(r"(?i)\bsl\s*\.?\s*no\b").unwrap(),
        Regex::new(r"(?i)brand\s*name.*\bO\s*\.?\s*B\b").unwrap(),
        Regex::new(r"(?i)name\s+of\s+the\s+shop").unwrap(),
    ];

    // Summary section labels; the table ends where they start
    pub static ref SUMMARY_MARKERS: Vec<Regex> = vec![
        Regex::new(r"(?i)opening\s*balance").unwrap(),
        Regex::new(r"(?i)office\s*cash").unwrap(),
        Regex::new(r"(?i)expendit").unwrap(),
        Regex::new(r"(?i)balance").unwrap(),
        Regex::new(r"(?i)total\s*sales").unwrap(),
    ];

    // Footer lines
    pub static ref FOOTER_MARKER: Regex = Regex::new(
        r"(?i)^(?:total|grand|signature)"
    ).unwrap();

    // Serial number in front of a brand name
    pub static ref SERIAL_PREFIX: Regex = Regex::new(r"^\d+\s+").unwrap();

    // Characters kept in a brand name
    pub static ref BRAND_PUNCTUATION: Regex = Regex::new(
        r"[^\p{L}\p{N} &.'()\-]"
    ).unwrap();

    // Standard bottle volumes in milliliters
    pub static ref BOTTLE_SIZE: Regex = Regex::new(
        r"(?i)\b(180|200|275|300|330|375|500|650|700|720|750|900|1000|1500|1800|2000)\s*(?:ml)?\b"
    ).unwrap();

    pub static ref MULTI_SPACE: Regex = Regex::new(r" {2,}").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_tokens() {
        let tokens: Vec<&str> = NUMBER_TOKEN
            .find_iter("Royal Stag 10 2 -1 12.5")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(tokens, vec!["10", "2", "-1", "12.5"]);
    }

    #[test]
    fn test_header_column_markers() {
        assert!(HEADER_OB.is_match("O.B"));
        assert!(HEADER_OB.is_match("OB"));
        assert!(HEADER_OB.is_match("O. B"));
        assert!(!HEADER_OB.is_match("JOB"));
        assert!(HEADER_CB.is_match("C.B"));
    }

    #[test]
    fn test_bottle_size_pattern() {
        assert!(BOTTLE_SIZE.is_match("Royal Stag 750ml"));
        assert!(BOTTLE_SIZE.is_match("Royal Stag 375 ML"));
        assert!(!BOTTLE_SIZE.is_match("Royal Stag 7500"));
    }
}
