//! Brand name extraction and bottle size inference.

use super::patterns::{BOTTLE_SIZE, BRAND_PUNCTUATION, MULTI_SPACE, SERIAL_PREFIX};

fn is_separator_gap(gap: &str) -> bool {
    gap.chars().all(|c| c == ' ' || c == ',')
}

/// Text in front of the trailing run of numeric tokens.
///
/// `spans` are the byte ranges of the numeric tokens in `line`. The whole
/// trailing run of tokens separated only by spaces or commas is removed when
/// it holds at least `min_run` tokens. A volume only stays with the brand
/// when a unit ("750ml") breaks the run. Without such a run the whole line
/// is returned.
pub fn split_brand<'a>(line: &'a str, spans: &[(usize, usize)], min_run: usize) -> &'a str {
    let Some(&(_, last_end)) = spans.last() else {
        return line.trim();
    };

    if !is_separator_gap(&line[last_end..]) {
        return line.trim();
    }

    let mut run = 1;
    for pair in spans.windows(2).rev() {
        if !is_separator_gap(&line[pair[0].1..pair[1].0]) {
            break;
        }
        run += 1;
    }

    if run < min_run.max(1) {
        return line.trim();
    }

    line[..spans[spans.len() - run].0].trim()
}

/// Tidy an OCR'd brand name.
///
/// Drops a leading serial number and isolated single letters, removes
/// punctuation other than `& . ' ( ) -`, and collapses spaces.
pub fn clean_brand(candidate: &str) -> String {
    let without_serial = SERIAL_PREFIX.replace(candidate.trim(), "");

    let words: Vec<&str> = without_serial
        .split(' ')
        .filter(|w| {
            let mut chars = w.chars();
            !matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
        })
        .collect();

    let joined = words.join(" ");
    let stripped = BRAND_PUNCTUATION.replace_all(&joined, "");
    MULTI_SPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Standard bottle volume mentioned in the brand text, if any.
pub fn infer_size_ml(brand: &str) -> Option<u32> {
    BOTTLE_SIZE
        .captures(brand)
        .and_then(|caps| caps[1].parse().ok())
}
