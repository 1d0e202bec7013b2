//! Locating the stock table header.

use super::patterns::{HEADER_BRAND, HEADER_CB, HEADER_LOOSE, HEADER_OB, HEADER_RECEIVED, HEADER_SALES};

/// Which header rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Every required column label present, in any order.
    Strict,
    /// Column labels found in textual order with looser spelling.
    Loose,
}

/// Position of the table header among the normalized lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    /// Index of the header line.
    pub line: usize,
    pub kind: HeaderKind,
}

impl HeaderMatch {
    /// First line that may hold table data.
    pub fn data_start(&self) -> usize {
        self.line + 1
    }
}

fn is_strict_header(line: &str) -> bool {
    HEADER_BRAND.is_match(line)
        && HEADER_OB.is_match(line)
        && HEADER_RECEIVED.is_match(line)
        && HEADER_CB.is_match(line)
        && HEADER_SALES.is_match(line)
}

/// Find the header line, preferring a strict match anywhere over a loose one.
pub fn locate_header<S: AsRef<str>>(lines: &[S]) -> Option<HeaderMatch> {
    let find = |kind: HeaderKind, pred: fn(&str) -> bool| {
        lines
            .iter()
            .position(|l| pred(l.as_ref()))
            .map(|line| HeaderMatch { line, kind })
    };

    find(HeaderKind::Strict, is_strict_header)
        .or_else(|| find(HeaderKind::Loose, |l| HEADER_LOOSE.is_match(l)))
}
