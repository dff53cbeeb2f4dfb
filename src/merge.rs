use crate::error::PathfigError;
use crate::path::{self, Segment};
use crate::value::{Map, Value};

/// Merge `overlay` on top of `base`, optionally nested under `prefix`.
///
/// Only maps and lists may be merged. A null base is replaced outright; map
/// into map is a shallow key union where `overlay` wins; list into list
/// appends. Every other pairing is an error.
pub fn merge(base: Value, overlay: Value, prefix: &str) -> Result<Value, PathfigError> {
    match &overlay {
        Value::Map(_) | Value::List(_) => {}
        Value::Null => return Err(PathfigError::NullValue),
        other => return Err(PathfigError::UnsupportedRoot { found: other.kind() }),
    }

    let keys = prefix_keys(prefix)?;
    merge_at(base, overlay, &keys, "")
}

fn prefix_keys(prefix: &str) -> Result<Vec<&str>, PathfigError> {
    path::segments(prefix)
        .map(|segment| match segment {
            Segment::Key(key) => Ok(key),
            Segment::Index(_) => Err(PathfigError::InvalidPrefix {
                prefix: prefix.to_string(),
            }),
        })
        .collect()
}

fn merge_at(base: Value, overlay: Value, keys: &[&str], at: &str) -> Result<Value, PathfigError> {
    let Some((key, rest)) = keys.split_first() else {
        return merge_slot(base, overlay, at);
    };

    let mut map = match base {
        Value::Null => Map::new(),
        Value::Map(map) => map,
        other => {
            return Err(PathfigError::IncompatibleMerge {
                at: at.to_string(),
                existing: other.kind(),
                incoming: "map",
            });
        }
    };

    let child_at = path::join(at, &Segment::Key(*key).to_string());
    let existing = map.remove(*key).unwrap_or_default();
    map.insert(key.to_string(), merge_at(existing, overlay, rest, &child_at)?);
    Ok(Value::Map(map))
}

fn merge_slot(base: Value, overlay: Value, at: &str) -> Result<Value, PathfigError> {
    match (base, overlay) {
        (Value::Null, overlay) => Ok(overlay),
        (Value::Map(mut base_map), Value::Map(overlay_map)) => {
            base_map.extend(overlay_map);
            Ok(Value::Map(base_map))
        }
        (Value::List(mut base_items), Value::List(overlay_items)) => {
            base_items.extend(overlay_items);
            Ok(Value::List(base_items))
        }
        (base, overlay) => Err(PathfigError::IncompatibleMerge {
            at: at.to_string(),
            existing: base.kind(),
            incoming: overlay.kind(),
        }),
    }
}
