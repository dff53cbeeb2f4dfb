//! The recursive decode engine.
//!
//! Every decodable type implements [`Decode`], which populates `self` from a
//! [`Value`] and reports how many leaf fields it actually set. The engine is
//! the glue between types:
//!
//! - [`decode_field`] applies a [`FieldPolicy`]: resolve the path against the
//!   current subtree, then fall back to the default, fail if required, or
//!   report the field as absent.
//! - Leaves (primitives and the well-known library types in [`common`]) go
//!   through [`decode_leaf`], which turns conversion failures into errors
//!   under strict mode and into "not set" otherwise.
//! - Containers recurse with a narrowed subtree: `Vec` by index, maps by key,
//!   derived structs by each field's own policy.
//!
//! Struct impls are generated by `#[derive(Decode)]`; the derive expands to
//! [`decode_struct_field`], [`decode_custom`] and [`decode_from_str`].

mod common;
mod duration;
mod primitive;

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

use tracing::trace;

use crate::error::{BoxError, PathfigError};
use crate::path::{self, Segment};
use crate::tag::FieldPolicy;
use crate::value::Value;

pub use duration::parse_duration;

/// Separator used when a string is decoded into a `Vec`.
pub const SLICE_SEPARATOR: char = ';';

/// A type that can be populated from a [`Value`].
///
/// Implementations return the number of leaf fields they set. Returning 0 is
/// not an error; it means nothing beneath this value came from the config.
pub trait Decode: Sized {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError>;

    /// Starting point for values the decoder creates itself: `Option`
    /// contents, collection elements and map keys.
    fn blank() -> Self;
}

/// Hand-written decoding for types that take full responsibility for the raw
/// value. Opt in with `#[derive(Decode)] #[pathfig(custom)]`.
///
/// Errors are always fatal, whatever the strictness of the field.
pub trait CustomDecode {
    fn decode_raw(&mut self, raw: &Value) -> Result<(), BoxError>;
}

/// State threaded through a decode: the active annotation tag, the
/// strictness in effect, and the path of the value being decoded.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    tag: &'a str,
    strict: bool,
    path: String,
}

impl<'a> Context<'a> {
    pub fn new(tag: &'a str, strict: bool) -> Self {
        Context {
            tag,
            strict,
            path: String::new(),
        }
    }

    /// Annotation tag whose policies apply, `"cfg"` unless configured.
    pub fn tag(&self) -> &'a str {
        self.tag
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Path of the current value from the decode root, for diagnostics.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Context for a child one segment down, keeping the strictness.
    pub fn child(&self, segment: Segment<'_>) -> Context<'a> {
        Context {
            tag: self.tag,
            strict: self.strict,
            path: path::join(&self.path, &segment.to_string()),
        }
    }

    fn enter(&self, path: String, strict: bool) -> Context<'a> {
        Context {
            tag: self.tag,
            strict,
            path,
        }
    }
}

/// Decode `target` from the value `policy.path` addresses inside `subtree`.
pub fn decode_field<T: Decode>(
    target: &mut T,
    subtree: &Value,
    policy: &FieldPolicy,
    cx: &Context<'_>,
) -> Result<usize, PathfigError> {
    let path = path::join(cx.path(), &policy.path);

    if policy.required && policy.default.is_some() {
        return Err(PathfigError::RequiredWithDefault { path });
    }

    let fallback;
    let source = match path::resolve(subtree, &policy.path) {
        Ok(found) => found,
        Err(err) if policy.required => {
            return Err(PathfigError::RequiredField {
                path,
                source: Box::new(err),
            });
        }
        Err(err) => match &policy.default {
            Some(literal) => {
                fallback = Value::String(literal.clone());
                &fallback
            }
            None => {
                trace!(path = %path, error = %err, "field not present");
                return Ok(0);
            }
        },
    };

    let cx = cx.enter(path, cx.is_strict() || policy.strict);
    target.decode(source, &cx)
}

/// Decode one field of a derived struct. `tags` holds the field's
/// annotations keyed by tag name; the context's tag picks which one applies.
pub fn decode_struct_field<T: Decode>(
    target: &mut T,
    value: &Value,
    cx: &Context<'_>,
    tags: &[(&str, &str)],
) -> Result<usize, PathfigError> {
    let annotation = tags
        .iter()
        .find(|(tag, _)| *tag == cx.tag())
        .map_or("", |(_, annotation)| *annotation);

    decode_field(target, value, &FieldPolicy::parse(annotation), cx)
}

/// Store the result of `convert` in `target`, counting it as one field.
///
/// Conversion failures abort under strict mode and are skipped otherwise.
pub fn decode_leaf<T>(
    target: &mut T,
    value: &Value,
    cx: &Context<'_>,
    convert: impl FnOnce(&Value) -> Result<T, PathfigError>,
) -> Result<usize, PathfigError> {
    match convert(value) {
        Ok(decoded) => {
            *target = decoded;
            Ok(1)
        }
        Err(err) if cx.is_strict() => Err(PathfigError::Field {
            path: cx.path().to_string(),
            source: Box::new(err),
        }),
        Err(err) => {
            trace!(path = cx.path(), error = %err, "skipping field that failed to decode");
            Ok(0)
        }
    }
}

/// Expansion of `#[pathfig(custom)]`.
pub fn decode_custom<T: CustomDecode + ?Sized>(
    target: &mut T,
    value: &Value,
    cx: &Context<'_>,
) -> Result<usize, PathfigError> {
    target
        .decode_raw(value)
        .map_err(|source| PathfigError::Custom {
            path: cx.path().to_string(),
            source,
        })?;
    Ok(1)
}

/// Expansion of `#[pathfig(from_str)]`: parse the value's text form.
pub fn decode_from_str<T>(target: &mut T, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError>
where
    T: FromStr,
    T::Err: Display,
{
    *target = value
        .to_string()
        .parse()
        .map_err(|err: T::Err| PathfigError::Unmarshal {
            path: cx.path().to_string(),
            reason: err.to_string(),
        })?;
    Ok(1)
}

// --- indirections ---

impl<T: Decode> Decode for Option<T> {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        if value.is_null() {
            return Ok(0);
        }

        let mut inner = T::blank();
        match inner.decode(value, cx) {
            Ok(0) => Ok(0),
            Ok(decoded) => {
                *self = Some(inner);
                Ok(decoded)
            }
            Err(err) if !cx.is_strict() && err.is_conversion() => {
                trace!(path = cx.path(), error = %err, "leaving optional field unset");
                Ok(0)
            }
            Err(err) => Err(err),
        }
    }

    fn blank() -> Self {
        None
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        (**self).decode(value, cx)
    }

    fn blank() -> Self {
        Box::new(T::blank())
    }
}

// --- sequences ---

impl<T: Decode> Decode for Vec<T> {
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        let split;
        let items: &[Value] = match value {
            Value::List(items) => items,
            Value::String(text) => {
                split = text
                    .split(SLICE_SEPARATOR)
                    .map(Value::from)
                    .collect::<Vec<_>>();
                &split
            }
            other => {
                return Err(PathfigError::UnexpectedShape {
                    path: cx.path().to_string(),
                    expected: "list",
                    found: other.kind(),
                });
            }
        };

        self.clear();
        let mut decoded = 0;
        for (index, item) in items.iter().enumerate() {
            let mut element = T::blank();
            let count = element.decode(item, &cx.child(Segment::Index(index)))?;
            if count > 0 {
                self.push(element);
                decoded += count;
            }
        }
        Ok(decoded)
    }

    fn blank() -> Self {
        Vec::new()
    }
}

// --- maps ---

fn decode_entries<K, V>(
    value: &Value,
    cx: &Context<'_>,
    mut insert: impl FnMut(K, V),
) -> Result<usize, PathfigError>
where
    K: Decode,
    V: Decode,
{
    let Value::Map(map) = value else {
        return Err(PathfigError::UnexpectedShape {
            path: cx.path().to_string(),
            expected: "map",
            found: value.kind(),
        });
    };

    let mut decoded = 0;
    for (raw_key, raw_value) in map {
        let entry_cx = cx.child(Segment::Key(raw_key));

        let mut key = K::blank();
        let key_count = key
            .decode(&Value::String(raw_key.clone()), &entry_cx)
            .map_err(|err| PathfigError::MapKey {
                path: cx.path().to_string(),
                key: raw_key.clone(),
                source: Box::new(err),
            })?;
        if key_count == 0 {
            continue;
        }

        let mut entry = V::blank();
        let count = entry.decode(raw_value, &entry_cx)?;
        if count > 0 {
            insert(key, entry);
            decoded += count;
        }
    }
    Ok(decoded)
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        let mut entries = Vec::new();
        let decoded = decode_entries(value, cx, |k, v| entries.push((k, v)))?;
        self.clear();
        self.extend(entries);
        Ok(decoded)
    }

    fn blank() -> Self {
        HashMap::default()
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: Decode + Ord,
    V: Decode,
{
    fn decode(&mut self, value: &Value, cx: &Context<'_>) -> Result<usize, PathfigError> {
        let mut entries = BTreeMap::new();
        let decoded = decode_entries(value, cx, |k, v| {
            entries.insert(k, v);
        })?;
        *self = entries;
        Ok(decoded)
    }

    fn blank() -> Self {
        BTreeMap::new()
    }
}
