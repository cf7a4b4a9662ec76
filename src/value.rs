/*!
Primitive value parsers (C2).

These operate directly on a byte slice taken from a [`crate::Node`]'s range and never allocate
except where a string needs to be unescaped.
*/

use std::borrow::Cow;

use once_cell::sync::Lazy;

use crate::error::{self, Error};
use crate::unescape::unescape_trusted;

/// Parse a signed 64-bit integer from `raw`.
///
/// Rejects empty input, a lone sign, any non-digit after the sign, and any trailing
/// fractional (`.`) or exponent (`e`/`E`) bytes — those make it a [`ErrorKind::TypeMismatch`](crate::ErrorKind::TypeMismatch).
pub(crate) fn parse_i64(raw: &[u8]) -> Result<i64, Error> {
    if raw.contains(&b'.') || raw.contains(&b'e') || raw.contains(&b'E') {
        return Err(error::type_mismatch(
            "number contains a fractional or exponent part",
        ));
    }

    let (negative, digits) = match raw.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some(_) => (false, raw),
        None => return Err(error::malformed("empty number")),
    };

    if digits.is_empty() {
        return Err(error::malformed("number has no digits"));
    }

    let mut value: i64 = 0;

    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(error::malformed("invalid digit in number"));
        }

        let digit = (b - b'0') as i64;

        value = value
            .checked_mul(10)
            .and_then(|v| {
                if negative {
                    v.checked_sub(digit)
                } else {
                    v.checked_add(digit)
                }
            })
            .ok_or_else(|| error::overflow("int64 overflow"))?;
    }

    Ok(value)
}

/// Parse an unsigned 64-bit integer from `raw`. Rejects a leading `-`.
pub(crate) fn parse_u64(raw: &[u8]) -> Result<u64, Error> {
    if raw.contains(&b'.') || raw.contains(&b'e') || raw.contains(&b'E') {
        return Err(error::type_mismatch(
            "number contains a fractional or exponent part",
        ));
    }

    if raw.first() == Some(&b'-') {
        return Err(error::type_mismatch("unsigned value cannot be negative"));
    }

    if raw.is_empty() {
        return Err(error::malformed("number has no digits"));
    }

    let mut value: u64 = 0;

    for &b in raw {
        if !b.is_ascii_digit() {
            return Err(error::malformed("invalid digit in number"));
        }

        let digit = (b - b'0') as u64;

        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| error::overflow("uint64 overflow"))?;
    }

    Ok(value)
}

// 10^0 ..= 10^308, built once on first float parse.
static POW10: Lazy<[f64; 309]> = Lazy::new(|| {
    let mut table = [0.0f64; 309];
    table[0] = 1.0;
    for i in 1..table.len() {
        table[i] = table[i - 1] * 10.0;
    }
    table
});

fn pow10(exp: i32) -> f64 {
    if exp >= 0 {
        POW10.get(exp as usize).copied().unwrap_or(f64::INFINITY)
    } else {
        match POW10.get((-exp) as usize) {
            Some(p) => 1.0 / p,
            None => 0.0,
        }
    }
}

/// Parse a 64-bit float from `raw`.
///
/// The mantissa is accumulated into a 64-bit integer until it would overflow, after which
/// further digits only adjust the decimal exponent; the final value is `mantissa * 10^exp`
/// using a precomputed power-of-ten table. At least one digit must be present.
pub(crate) fn parse_f64(raw: &[u8]) -> Result<f64, Error> {
    let mut i = 0;
    let len = raw.len();

    let negative = if i < len && raw[i] == b'-' {
        i += 1;
        true
    } else if i < len && raw[i] == b'+' {
        i += 1;
        false
    } else {
        false
    };

    let mut mantissa: u64 = 0;
    let mut mantissa_active = true;
    let mut dec_exp: i32 = 0;
    let mut saw_digit = false;

    while i < len && raw[i].is_ascii_digit() {
        saw_digit = true;
        accumulate(&mut mantissa, &mut mantissa_active, &mut dec_exp, raw[i] - b'0', false);
        i += 1;
    }

    if i < len && raw[i] == b'.' {
        i += 1;
        while i < len && raw[i].is_ascii_digit() {
            saw_digit = true;
            accumulate(&mut mantissa, &mut mantissa_active, &mut dec_exp, raw[i] - b'0', true);
            i += 1;
        }
    }

    if !saw_digit {
        return Err(error::malformed("float has no digits"));
    }

    if i < len && (raw[i] == b'e' || raw[i] == b'E') {
        i += 1;
        let exp_negative = if i < len && raw[i] == b'-' {
            i += 1;
            true
        } else if i < len && raw[i] == b'+' {
            i += 1;
            false
        } else {
            false
        };

        let mut exp_value: i32 = 0;
        let mut saw_exp_digit = false;
        while i < len && raw[i].is_ascii_digit() {
            saw_exp_digit = true;
            exp_value = exp_value.saturating_mul(10).saturating_add((raw[i] - b'0') as i32);
            i += 1;
        }

        if !saw_exp_digit {
            return Err(error::malformed("exponent has no digits"));
        }

        dec_exp += if exp_negative { -exp_value } else { exp_value };
    }

    let magnitude = (mantissa as f64) * pow10(dec_exp);
    Ok(if negative { -magnitude } else { magnitude })
}

#[inline]
fn accumulate(mantissa: &mut u64, mantissa_active: &mut bool, dec_exp: &mut i32, digit: u8, fractional: bool) {
    if *mantissa_active {
        if let Some(next) = mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add(digit as u64))
        {
            *mantissa = next;
            if fractional {
                *dec_exp -= 1;
            }
            return;
        }

        *mantissa_active = false;
    }

    if !fractional {
        *dec_exp += 1;
    }
}

/// Parse a JSON boolean literal. Accepts exactly `true` or `false`.
pub(crate) fn parse_bool(raw: &[u8]) -> Result<bool, Error> {
    match raw {
        b"true" => Ok(true),
        b"false" => Ok(false),
        _ => Err(error::malformed("invalid boolean literal")),
    }
}

/// Extract the bytes between a string Node's enclosing quotes, without unescaping.
///
/// `raw` must include the surrounding quotes.
pub(crate) fn string_inner(raw: &[u8]) -> &[u8] {
    if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        &[]
    }
}

/// Resolve a string's content, borrowing when there's nothing to unescape.
pub(crate) fn parse_string(raw: &[u8]) -> Result<Cow<'_, str>, Error> {
    let inner = string_inner(raw);
    let s = from_utf8_unchecked!(inner);

    if inner.contains(&b'\\') {
        // SAFETY: `inner` came from a string scanned by `crate::scan`, so it can't end
        // on an unescaped `\` — a trailing `\` would have consumed the closing quote.
        Ok(Cow::Owned(unsafe { unescape_trusted(s) }))
    } else {
        Ok(Cow::Borrowed(s))
    }
}

/// The logical (escape-aware) character count of a string Node's raw bytes.
///
/// A single-character escape (`\n`, `\"`, ...) or a `\uXXXX` escape counts as one character,
/// matching what `as_str` would decode it to; a `\uXXXX\uYYYY` surrogate pair counts as the one
/// character it jointly decodes to, using the same "lone surrogate means a pair follows" rule
/// as `unescape_trusted`. Multi-byte UTF8 sequences in unescaped text count as one character
/// each (decided in `DESIGN.md`).
pub(crate) fn string_char_len(raw: &[u8]) -> usize {
    let inner = string_inner(raw);
    let s = from_utf8_unchecked!(inner);

    let mut count = 0;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        count += 1;
        if c != '\\' {
            continue;
        }

        if chars.next() == Some('u') {
            let code = take_hex4(&mut chars);
            if char::try_from(code).is_err() {
                // a lone code in the surrogate range is the first half of a pair; the second
                // `\uXXXX` decodes together with it into a single character, so fold it into
                // this count instead of counting it separately.
                let mut lookahead = chars.clone();
                if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                    take_hex4(&mut lookahead);
                    chars = lookahead;
                }
            }
        }
    }

    count
}

fn take_hex4(chars: &mut std::str::Chars) -> u32 {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars.next().and_then(|c| c.to_digit(16)).unwrap_or(0);
        value = value * 16 + digit;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints() {
        assert_eq!(123, parse_i64(b"123").unwrap());
        assert_eq!(-123, parse_i64(b"-123").unwrap());
        assert_eq!(0, parse_i64(b"0").unwrap());
    }

    #[test]
    fn int_overflow() {
        assert!(parse_i64(b"9223372036854775808").is_err());
        assert!(parse_i64(b"-9223372036854775809").is_err());
    }

    #[test]
    fn int_rejects_fraction() {
        assert!(parse_i64(b"1.5").is_err());
    }

    #[test]
    fn uint_rejects_negative() {
        assert!(parse_u64(b"-1").is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(1.5, parse_f64(b"1.5").unwrap());
        assert_eq!(-3.25, parse_f64(b"-3.25").unwrap());
        assert_eq!(100.0, parse_f64(b"1e2").unwrap());
        assert_eq!(0.025, parse_f64(b"2.5e-2").unwrap());
        assert_eq!(0.0, parse_f64(b"0").unwrap());
    }

    #[test]
    fn bools() {
        assert_eq!(true, parse_bool(b"true").unwrap());
        assert_eq!(false, parse_bool(b"false").unwrap());
        assert!(parse_bool(b"tru").is_err());
    }

    #[test]
    fn string_borrowed_when_unescaped() {
        let raw = br#""hello""#;
        match parse_string(raw).unwrap() {
            Cow::Borrowed(s) => assert_eq!("hello", s),
            Cow::Owned(_) => panic!("expected a borrow"),
        }
    }

    #[test]
    fn string_owned_when_escaped() {
        let raw = br#""he\"llo""#;
        match parse_string(raw).unwrap() {
            Cow::Owned(s) => assert_eq!("he\"llo", s),
            Cow::Borrowed(_) => panic!("expected an owned decode"),
        }
    }

    #[test]
    fn string_len_is_escape_aware() {
        assert_eq!(2, string_char_len(br#""\n\t""#));
        assert_eq!(5, string_char_len(br#""hello""#));
    }

    #[test]
    fn string_len_counts_unicode_escape_as_one_char() {
        // raw JSON text: "\u58c1"
        let raw = b"\"\\u58c1\"";
        assert_eq!(1, string_char_len(raw));
        assert_eq!(1, parse_string(raw).unwrap().chars().count());
    }

    #[test]
    fn string_len_counts_surrogate_pair_as_one_char() {
        // raw JSON text: "\ud83d\ude04"
        let raw = b"\"\\ud83d\\ude04\"";
        assert_eq!(1, string_char_len(raw));
        assert_eq!(1, parse_string(raw).unwrap().chars().count());
    }

    #[test]
    fn string_len_mixes_plain_text_and_escapes() {
        // raw JSON text: "ab\u58c1c"
        assert_eq!(4, string_char_len(b"\"ab\\u58c1c\""));
    }
}
