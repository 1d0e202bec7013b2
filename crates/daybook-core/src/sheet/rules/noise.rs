//! Line classification for the stock table: noise, terminators and candidates.

use super::patterns::{FOOTER_MARKER, HEADER_FRAGMENTS, SUMMARY_MARKERS};

/// Lone tokens the OCR leaves behind from stamps and ruling lines.
pub const NOISE_TOKENS: &[&str] = &["Q", "P", "N"];

/// How the row parser should treat a normalized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Skip the line and keep going.
    Noise,
    /// The table has ended; stop reading rows.
    Terminator,
    /// The line may hold a data row.
    Candidate,
}

/// Classify a single line.
///
/// `extra_noise` extends [`NOISE_TOKENS`] with configured artifacts.
pub fn classify_line(line: &str, extra_noise: &[String]) -> LineClass {
    let line = line.trim();

    if line.is_empty() || is_noise_token(line, extra_noise) {
        return LineClass::Noise;
    }

    if HEADER_FRAGMENTS.iter().any(|re| re.is_match(line)) {
        return LineClass::Noise;
    }

    if SUMMARY_MARKERS.iter().any(|re| re.is_match(line)) || FOOTER_MARKER.is_match(line) {
        return LineClass::Terminator;
    }

    LineClass::Candidate
}

fn is_noise_token(line: &str, extra_noise: &[String]) -> bool {
    let mut chars = line.chars();
    let lone_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());

    lone_letter
        || NOISE_TOKENS.contains(&line)
        || extra_noise.iter().any(|t| t.trim() == line)
}
