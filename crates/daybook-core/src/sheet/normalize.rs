//! Canonical line-oriented form of raw sheet text.

use super::rules::patterns::MULTI_SPACE;

/// Normalized text: trimmed, non-empty lines in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    lines: Vec<String>,
}

impl NormalizedText {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined with `\n`, the form label searches run against.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Normalize raw OCR or text-layer output.
///
/// Carriage returns become line breaks, tabs and vertical bars become
/// spaces, space runs collapse, lines are trimmed and empty ones dropped.
pub fn normalize(raw: &str) -> NormalizedText {
    let lines = raw
        .split(['\r', '\n'])
        .map(|line| {
            let spaced: String = line
                .chars()
                .map(|c| if c == '\t' || c == '|' { ' ' } else { c })
                .collect();
            MULTI_SPACE.replace_all(&spaced, " ").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect();

    NormalizedText { lines }
}
