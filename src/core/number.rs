//! Path-data number scanning
//!
//! Grammar: `[+-]? (digits ['.' digits*] | '.' digits) ([eE] [+-]? digits)?`.
//! The scanner only finds the extent of the number; conversion goes through
//! `str::parse::<f64>` on the borrowed bytes, so nothing is allocated.

use super::charset::DIGITS;
use super::span::ByteSpan;

/// Length in bytes of the number at the start of `input`, or `None` if
/// `input` does not start with a number.
///
/// A second `.` ends the number, so `"1.5.5"` scans as `1.5` followed by `.5`.
/// An `e` not followed by digits is left unconsumed.
pub fn scan_number(input: &[u8]) -> Option<usize> {
    let mut pos = 0;
    if matches!(input.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(&input[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if input.get(pos) == Some(&b'.') {
        frac_digits = count_digits(&input[pos + 1..]);
        if int_digits == 0 && frac_digits == 0 {
            return None;
        }
        pos += 1 + frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(input.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(input.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&input[exp.min(input.len())..]);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }

    Some(pos)
}

#[inline]
fn count_digits(input: &[u8]) -> usize {
    input.iter().take_while(|&&b| DIGITS.contains(b)).count()
}

/// Consume a number from the front of `cursor`.
///
/// On failure the cursor is left untouched.
pub fn read_number(cursor: &mut ByteSpan<'_>) -> Option<f64> {
    let len = scan_number(cursor.as_bytes())?;
    let text = std::str::from_utf8(&cursor.as_bytes()[..len]).ok()?;
    let value = text.parse::<f64>().ok()?;
    cursor.advance(len);
    Some(value)
}

/// Consume a single-character arc flag (`0` or `1`).
///
/// Flags never need a separator after them, so `"11"` is two flags.
pub fn read_flag(cursor: &mut ByteSpan<'_>) -> Option<bool> {
    let flag = match cursor.peek()? {
        b'0' => false,
        b'1' => true,
        _ => return None,
    };
    cursor.advance(1);
    Some(flag)
}
