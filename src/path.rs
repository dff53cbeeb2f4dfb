//! Path strings addressing into a [`Value`] tree.
//!
//! A path is a sequence of segments. Keys are separated by `.`; a bracketed
//! segment is an index when its content is all ASCII digits and a literal key
//! otherwise, which is how keys containing dots are addressed:
//!
//! ```text
//! database.replicas[0].host     key, key, index, key
//! labels[app.kubernetes.io]     key, key "app.kubernetes.io"
//! ```
//!
//! Resolution walks one segment at a time and stops at the first failure;
//! there are no partial results.

use std::fmt;

use crate::error::PathfigError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) if needs_brackets(key) => write!(f, "[{key}]"),
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

fn needs_brackets(key: &str) -> bool {
    key.contains(['.', '[', ']'])
}

/// Split the first segment off `path`, returning it with the unparsed rest.
///
/// Returns `None` once the path is exhausted.
pub fn next_segment(path: &str) -> Option<(Segment<'_>, &str)> {
    if path.is_empty() {
        return None;
    }

    if let Some(inner) = path.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            // unclosed bracket: the remainder is one literal key
            return Some((Segment::Key(inner), ""));
        };
        let content = &inner[..close];
        let rest = &inner[close + 1..];
        let rest = rest.strip_prefix('.').unwrap_or(rest);

        let segment = if !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit()) {
            match content.parse::<usize>() {
                Ok(index) => Segment::Index(index),
                Err(_) => Segment::Key(content),
            }
        } else {
            Segment::Key(content)
        };
        return Some((segment, rest));
    }

    match path.find(['.', '[']) {
        None => Some((Segment::Key(path), "")),
        Some(at) if path.as_bytes()[at] == b'.' => Some((Segment::Key(&path[..at]), &path[at + 1..])),
        Some(at) => Some((Segment::Key(&path[..at]), &path[at..])),
    }
}

/// Iterate over all segments of `path`.
pub fn segments(path: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut rest = path;
    std::iter::from_fn(move || {
        let (segment, tail) = next_segment(rest)?;
        rest = tail;
        Some(segment)
    })
}

/// Walk `root` along `path`. The empty path resolves to `root` itself.
pub fn resolve<'v>(root: &'v Value, path: &str) -> Result<&'v Value, PathfigError> {
    segments(path).try_fold(root, step)
}

/// Resolve a single segment against `current`.
pub fn step<'v>(current: &'v Value, segment: Segment<'_>) -> Result<&'v Value, PathfigError> {
    match segment {
        Segment::Key(key) => match current {
            Value::Map(map) => map.get(key).ok_or_else(|| PathfigError::KeyNotFound {
                key: key.to_string(),
            }),
            other => Err(PathfigError::NotAMapping {
                key: key.to_string(),
                found: other.kind(),
            }),
        },
        Segment::Index(index) => match current {
            Value::List(items) => items.get(index).ok_or(PathfigError::IndexOutOfBounds {
                index,
                len: items.len(),
            }),
            other => Err(PathfigError::NotAList {
                index,
                found: other.kind(),
            }),
        },
    }
}

/// Append a rendered segment to a dotted path, for error messages.
pub(crate) fn join(base: &str, segment: &str) -> String {
    if segment.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        segment.to_string()
    } else if segment.starts_with('[') {
        format!("{base}{segment}")
    } else {
        format!("{base}.{segment}")
    }
}
