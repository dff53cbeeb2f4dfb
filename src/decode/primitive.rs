//! Decoders for `bool`, `char`, strings, floats and the integer families.
//!
//! Native values of a matching kind are used directly. Anything else is
//! formatted with [`Value`]'s `Display` and parsed, so `"8080"` decodes into
//! a `u16` and `8080` decodes into a `String`.

use super::{Context, Decode, decode_leaf};
use crate::error::PathfigError;
use crate::value::Value;

impl Decode for String {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| Ok(v.to_string()))
    }

    fn blank() -> Self {
        String::new()
    }
}

impl Decode for bool {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| match v {
            Value::Bool(b) => Ok(*b),
            other => parse_bool(&other.to_string()),
        })
    }

    fn blank() -> Self {
        false
    }
}

impl Decode for char {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| {
            let text = v.to_string();
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(PathfigError::invalid("char", &text, "expected exactly one character")),
            }
        })
    }

    fn blank() -> Self {
        '\0'
    }
}

fn parse_bool(text: &str) -> Result<bool, PathfigError> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(PathfigError::invalid("bool", text, "expected true or false")),
    }
}

macro_rules! decode_float {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
                decode_leaf(self, value, cx, |v| match v {
                    Value::Float(f) => {
                        let narrowed = *f as $ty;
                        if f.is_finite() && !narrowed.is_finite() {
                            return Err(PathfigError::invalid(stringify!($ty), f, "out of range"));
                        }
                        Ok(narrowed)
                    }
                    Value::Integer(i) => Ok(*i as $ty),
                    other => {
                        let text = other.to_string();
                        text.trim().parse::<$ty>().map_err(|err| {
                            PathfigError::invalid(stringify!($ty), &text, err)
                        })
                    }
                })
            }

            fn blank() -> Self {
                0.0
            }
        }
    )*};
}

decode_float!(f32, f64);

macro_rules! decode_integer {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
                decode_leaf(self, value, cx, |v| {
                    let wide = match v {
                        Value::Integer(i) => *i,
                        other => parse_integer(&other.to_string(), stringify!($ty))?,
                    };
                    <$ty>::try_from(wide).map_err(|_| {
                        PathfigError::invalid(stringify!($ty), wide, "out of range")
                    })
                })
            }

            fn blank() -> Self {
                0
            }
        }
    )*};
}

decode_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Parse an integer literal with an optional sign, `0x`/`0o`/`0b` radix
/// prefix, and `_` separators between digits.
fn parse_integer(text: &str, expected: &'static str) -> Result<i128, PathfigError> {
    let invalid = |reason: &str| PathfigError::invalid(expected, text, reason);

    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, lower.as_str())
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err(invalid("not an integer"));
    }
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.starts_with(['+', '-']) {
        return Err(invalid("not an integer"));
    }

    let magnitude = i128::from_str_radix(&digits, radix).map_err(|err| invalid(&err.to_string()))?;
    Ok(if negative { -magnitude } else { magnitude })
}
