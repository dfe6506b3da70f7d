//! Line normalization.
//!
//! Children type on phone and tablet IMEs which happily produce full-width
//! numerals (`３`) where a repeat count is expected. Before any matching, each
//! line is rewritten so those numerals become ASCII and surrounding
//! whitespace (including the ideographic space `U+3000`) is dropped.

const FULLWIDTH_ZERO: char = '\u{FF10}';
const FULLWIDTH_NINE: char = '\u{FF19}';

/// Replace every full-width numeral `０`..=`９` with its ASCII digit.
///
/// All other characters pass through unchanged.
pub fn normalize_digits(line: &str) -> String {
    line.chars().map(halfwidth_digit).collect()
}

fn halfwidth_digit(c: char) -> char {
    if (FULLWIDTH_ZERO..=FULLWIDTH_NINE).contains(&c) {
        let offset = c as u32 - FULLWIDTH_ZERO as u32;
        char::from_digit(offset, 10).unwrap_or(c)
    } else {
        c
    }
}

/// Normalize digits and trim one raw program line.
///
/// An editor-inserted BOM counts as whitespace here.
pub(crate) fn normalize_line(raw: &str) -> String {
    let digits = normalize_digits(raw);
    digits.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}').to_string()
}
