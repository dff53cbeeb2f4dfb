use super::{Format, Loader};
use crate::error::PathfigError;
use crate::value::{Map, Value};

/// dotenv-style `KEY=value` files, parsed with `dotenvy`.
///
/// The result is a flat map of strings: `DB_HOST=x` is addressed by the path
/// `DB_HOST`, not `db.host`. Typed fields still decode because the primitive
/// decoders parse text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env;

pub type EnvLoader = Loader<Env>;

impl Format for Env {
    const NAME: &'static str = "Env";

    fn parse(text: &str) -> Result<Value, PathfigError> {
        let mut map = Map::new();
        for entry in dotenvy::from_read_iter(text.as_bytes()) {
            let (key, value) = entry.map_err(|err| PathfigError::Parse {
                format: Self::NAME,
                reason: err.to_string(),
            })?;
            map.insert(key, Value::String(value));
        }
        Ok(Value::Map(map))
    }
}

impl Loader<Env> {
    /// Add the current process environment. Variables whose name or value
    /// is not valid UTF-8 are skipped.
    pub fn from_environment(self) -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        self.from_vars(vars)
    }

    /// Add a set of variables as one flat map.
    ///
    /// Takes an iterator so tests can pass synthetic data instead of the
    /// real environment.
    pub fn from_vars<K, V>(self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = vars
            .into_iter()
            .map(|(key, value)| (key.into(), Value::String(value.into())))
            .collect::<Map>();
        self.record(Ok(Value::Map(map)))
    }
}
