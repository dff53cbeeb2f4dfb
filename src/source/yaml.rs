use super::{Format, Loader};
use crate::error::PathfigError;
use crate::value::Value;

/// YAML documents. Non-string keys are stringified and tags are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

pub type YamlLoader = Loader<Yaml>;

impl Format for Yaml {
    const NAME: &'static str = "YAML";

    fn parse(text: &str) -> Result<Value, PathfigError> {
        serde_yaml::from_str::<serde_yaml::Value>(text)
            .map(Value::from)
            .map_err(|err| PathfigError::Parse {
                format: Self::NAME,
                reason: err.to_string(),
            })
    }
}
