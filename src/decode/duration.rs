use std::time::Duration;

use crate::error::PathfigError;

const NANOS_PER_UNIT: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("\u{b5}s", 1_000),
    ("\u{3bc}s", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Parse a duration literal such as `"15s"`, `"1h30m"` or `"1.5ms"`.
///
/// The literal is a sequence of decimal numbers, each followed by a unit
/// (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`). A bare `0` is also accepted.
/// Negative literals are rejected unless they are zero.
pub fn parse_duration(text: &str) -> Result<Duration, PathfigError> {
    let invalid = |reason: &str| PathfigError::invalid("duration", text, reason);

    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(fraction) => {
                let frac_len = fraction.bytes().take_while(u8::is_ascii_digit).count();
                fraction.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("expected a number"));
        }

        let unit_len = after_number
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map_or(after_number.len(), |(at, _)| at);
        let (unit, tail) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(invalid("missing unit"));
        }
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| invalid(&format!("unknown unit '{unit}'")))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid("number out of range"))?
        };
        let mut amount = whole
            .checked_mul(scale)
            .ok_or_else(|| invalid("duration out of range"))?;

        // Digits past nanosecond precision of an hour cannot matter.
        let frac_digits = &frac_part[..frac_part.len().min(20)];
        if !frac_digits.is_empty() {
            let numerator: u128 = frac_digits.parse().map_err(|_| invalid("invalid fraction"))?;
            let denominator = 10u128.pow(frac_digits.len() as u32);
            amount += numerator * scale / denominator;
        }

        total = total
            .checked_add(amount)
            .ok_or_else(|| invalid("duration out of range"))?;
        rest = tail;
    }

    if negative && total != 0 {
        return Err(invalid("negative durations are not supported"));
    }

    let nanos = u64::try_from(total).map_err(|_| invalid("duration out of range"))?;
    Ok(Duration::from_nanos(nanos))
}
