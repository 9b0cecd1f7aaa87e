//! Locale-independent string to number conversion.
//!
//! Surrounding ASCII whitespace is ignored. Anything else that is not part
//! of a number makes the conversion fail, so a malformed value can never be
//! mistaken for zero.

/// Parses a signed decimal integer.
pub fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Parses an unsigned integer in decimal, `0x` hexadecimal or leading-zero
/// octal notation.
///
/// # Examples
///
/// ```
/// use labctl_cmdline::parse_uint;
///
/// assert_eq!(parse_uint("42"), Some(42));
/// assert_eq!(parse_uint("0x1F"), Some(31));
/// assert_eq!(parse_uint("017"), Some(15));
/// assert_eq!(parse_uint("-1"), None);
/// ```
pub fn parse_uint(text: &str) -> Option<u64> {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);

    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Parses a floating point number (`1.5`, `-2e3`, `inf`, `nan`).
pub fn parse_double(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}
