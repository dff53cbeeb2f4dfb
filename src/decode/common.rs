//! Decoders for well-known library types: durations, IP addresses, URLs,
//! timestamps and raw JSON payloads.
//!
//! All of them reject a null source with [`PathfigError::NullSource`], which
//! keeps "nothing there" distinguishable from "there but malformed".

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use url::Url;

use super::{Context, Decode, decode_leaf, parse_duration};
use crate::error::PathfigError;
use crate::value::Value;

fn present<'v>(value: &'v Value, expected: &'static str) -> Result<&'v Value, PathfigError> {
    match value {
        Value::Null => Err(PathfigError::NullSource { expected }),
        other => Ok(other),
    }
}

impl Decode for Duration {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| {
            parse_duration(&present(v, "duration")?.to_string())
        })
    }

    fn blank() -> Self {
        Duration::ZERO
    }
}

macro_rules! decode_ip {
    ($($ty:ty => $name:literal, $blank:expr);*) => {$(
        impl Decode for $ty {
            fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
                decode_leaf(self, value, cx, |v| {
                    let text = present(v, $name)?.to_string();
                    text.parse::<$ty>()
                        .map_err(|err| PathfigError::invalid($name, &text, err))
                })
            }

            fn blank() -> Self {
                $blank
            }
        }
    )*};
}

decode_ip!(
    IpAddr => "IP address", IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    Ipv4Addr => "IPv4 address", Ipv4Addr::UNSPECIFIED;
    Ipv6Addr => "IPv6 address", Ipv6Addr::UNSPECIFIED
);

impl Decode for Url {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| {
            let text = present(v, "URL")?.to_string();
            Url::parse(&text).map_err(|err| PathfigError::invalid("URL", &text, err))
        })
    }

    fn blank() -> Self {
        // infallible: a fixed, valid absolute URL
        Url::parse("about:blank").expect("pathfig: static URL literal is valid")
    }
}

fn parse_timestamp(value: &Value) -> Result<DateTime<FixedOffset>, PathfigError> {
    match present(value, "timestamp")? {
        Value::Datetime(dt) => Ok(*dt),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map_err(|err| PathfigError::invalid("RFC 3339 timestamp", text, err)),
        other => Err(PathfigError::NonStringTimestamp {
            found: other.kind(),
        }),
    }
}

impl Decode for DateTime<FixedOffset> {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, parse_timestamp)
    }

    fn blank() -> Self {
        DateTime::<Utc>::default().fixed_offset()
    }
}

impl Decode for DateTime<Utc> {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| Ok(parse_timestamp(v)?.with_timezone(&Utc)))
    }

    fn blank() -> Self {
        DateTime::<Utc>::default()
    }
}

/// The subtree re-encoded as JSON, whatever format it was loaded from.
impl Decode for serde_json::Value {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| {
            serde_json::to_value(present(v, "raw JSON")?)
                .map_err(|err| PathfigError::invalid("raw JSON", v, err))
        })
    }

    fn blank() -> Self {
        serde_json::Value::Null
    }
}

/// The subtree itself, untouched.
impl Decode for Value {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        decode_leaf(self, value, cx, |v| Ok(present(v, "value")?.clone()))
    }

    fn blank() -> Self {
        Value::Null
    }
}
