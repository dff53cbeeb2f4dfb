use super::{Format, Loader};
use crate::error::PathfigError;
use crate::value::Value;

/// TOML documents. Offset datetimes become [`Value::Datetime`]; local dates
/// and times stay strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

pub type TomlLoader = Loader<Toml>;

impl Format for Toml {
    const NAME: &'static str = "TOML";

    fn parse(text: &str) -> Result<Value, PathfigError> {
        ::toml::from_str::<::toml::Table>(text)
            .map(|table| Value::from(::toml::Value::Table(table)))
            .map_err(|err| PathfigError::Parse {
                format: Self::NAME,
                reason: err.to_string(),
            })
    }
}
