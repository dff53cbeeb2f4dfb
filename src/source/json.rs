use super::{Format, Loader};
use crate::error::PathfigError;
use crate::value::Value;

/// JSON documents, parsed with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

pub type JsonLoader = Loader<Json>;

impl Format for Json {
    const NAME: &'static str = "JSON";

    fn parse(text: &str) -> Result<Value, PathfigError> {
        serde_json::from_str::<serde_json::Value>(text)
            .map(Value::from)
            .map_err(|err| PathfigError::Parse {
                format: Self::NAME,
                reason: err.to_string(),
            })
    }
}
