//! Repeat-block markers.
//!
//! ```text
//! 3かい くりかえす    header: count, optional counter word, repeat verb
//! ...
//! おわり             terminator, must be the whole line
//! ```
//!
//! The header may appear anywhere inside the line (`ぜんぶで 3かい くりかえそう`
//! is a header too). Digits must already be ASCII, see `normalize.rs`.

/// Keyword that closes a repeat block.
pub(crate) const TERMINATOR: &str = "おわり";

/// Recognize a repeat header and return its count.
///
/// A count that does not fit in `u32` is treated as unparseable and becomes
/// `0`, so the block contributes nothing.
pub(crate) fn parse_header(line: &str) -> Option<u32> {
    let re = regex!(r"([0-9]+)\s*(?:かい|回)?\s*(?:くりかえ|くりかえす|くりかえし)");
    let caps = re.captures(line)?;
    let count = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()).unwrap_or(0);
    Some(count)
}

pub(crate) fn is_terminator(line: &str) -> bool {
    line == TERMINATOR
}
