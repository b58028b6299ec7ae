//! Locale-aware string ordering for binding symbols.
//!
//! Approximates root-locale collation for identifier-like strings:
//! - primary level ignores case and orders punctuation before digits before letters
//! - tertiary level puts lowercase before uppercase
//! - raw code point order breaks any remaining tie, so the order is total

use std::cmp::Ordering;

fn primary_key(c: char) -> (u8, char) {
  let class = if c.is_alphabetic() {
    2
  } else if c.is_numeric() {
    1
  } else {
    0
  };
  (class, c.to_lowercase().next().unwrap_or(c))
}

/// Compare two strings in collation order.
pub fn compare(a: &str, b: &str) -> Ordering {
  a.chars()
    .map(primary_key)
    .cmp(b.chars().map(primary_key))
    .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
    .then_with(|| a.cmp(b))
}
