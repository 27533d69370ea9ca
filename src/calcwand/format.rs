//! Conversions between `f64` values and calculator display strings.
//!
//! The display follows the conventions users know from web calculators:
//! whole numbers carry no fractional part, very large or very small magnitudes
//! switch to exponent form, and non-finite values are spelled `Infinity`,
//! `-Infinity` and `NaN`.
//!
//! ```rust
//! use calcwand::format::{format_number, parse_number};
//!
//! assert_eq!(format_number(8.0), "8");
//! assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
//! assert_eq!(format_number(5.0 / 0.0), "Infinity");
//! assert_eq!(format_number(1e21), "1e+21");
//!
//! assert_eq!(parse_number("12."), 12.0);
//! assert!(parse_number("abc").is_nan());
//! ```

/// Maximum number of characters a computed result may occupy on the display.
pub const MAX_DISPLAY_LEN: usize = 15;

/// Render a number the way the display shows it.
///
/// Uses the shortest digit string that round-trips, switching to exponent
/// notation when the decimal exponent falls outside `[-7, 21)`. Negative zero
/// renders as `"0"`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, point) = shortest_digits(value.abs());
    let k = digits.len() as i32;

    let body = if k <= point && point <= 21 {
        let mut s = digits.clone();
        s.extend(std::iter::repeat('0').take((point - k) as usize));
        s
    } else if 0 < point && point <= 21 {
        let (int_part, frac_part) = digits.split_at(point as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let exponent = point - 1;
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, exp_sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, exp_sign, exponent.abs())
        }
    };

    format!("{}{}", sign, body)
}

/// Shortest round-trip decimal digits of a positive finite value, plus the
/// position of the decimal point relative to the first digit.
fn shortest_digits(value: f64) -> (String, i32) {
    // `{:e}` yields the shortest representation, e.g. "1.2345e3".
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => (scientific.as_str(), "0"),
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits, exponent + 1)
}

/// Parse the longest numeric prefix of `text`, returning `NaN` when there is none.
///
/// Leading whitespace is skipped, an optional sign and the word `Infinity` are
/// accepted, and trailing garbage after a valid prefix is ignored.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let negative = end == 1 && bytes[0] == b'-';

    if trimmed[end..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digit_count = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digit_count += frac_end - frac_start;
        if digit_count > 0 {
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Keep the first `end` characters of `text`; a negative `end` drops that
/// many characters from the back instead.
pub fn slice_prefix(text: &str, end: isize) -> String {
    let len = text.chars().count() as isize;
    let stop = if end < 0 { (len + end).max(0) } else { end.min(len) };
    text.chars().take(stop as usize).collect()
}

/// Cut a formatted number to `end` characters (see [`slice_prefix`]).
///
/// When the cut would leave something that no longer reads as a number
/// (an empty string, a lone sign, `"Infinit"`), the full text is kept.
pub fn truncate_number(formatted: &str, end: isize) -> String {
    let cut = slice_prefix(formatted, end);
    if parse_number(&cut).is_nan() && cut != "NaN" {
        formatted.to_string()
    } else {
        cut
    }
}

/// The part of a display string after its integer portion and decimal point.
///
/// For `"-12.345"` this is `"345"`, for `"12"` it is empty.
pub fn fractional_part(display: &str) -> &str {
    let rest = display.strip_prefix('-').unwrap_or(display);
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    rest.strip_prefix('.').unwrap_or(rest)
}
