//! Source adapters: turn text in some format into [`Value`]s for
//! [`ConfigSet::load`](crate::ConfigSet::load).
//!
//! A [`Loader`] collects one value per input. Inputs that fail to read or
//! parse are recorded as errors instead, and a load with any recorded error
//! is rejected as a whole:
//!
//! ```ignore
//! let mut config = ConfigSet::new();
//! config.load(
//!     TomlLoader::new()
//!         .from_file("/etc/myapp/defaults.toml")
//!         .from_file("myapp.toml"),
//!     LoadOptions::default(),
//! )?;
//! ```

#[cfg(feature = "env")]
mod env;
mod json;
#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "yaml")]
mod yaml;

use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use tracing::debug;

use crate::error::PathfigError;
use crate::value::Value;

#[cfg(feature = "env")]
pub use env::{Env, EnvLoader};
pub use json::{Json, JsonLoader};
#[cfg(feature = "toml")]
pub use self::toml::{Toml, TomlLoader};
#[cfg(feature = "yaml")]
pub use yaml::{Yaml, YamlLoader};

/// Anything that can feed values into a [`ConfigSet`](crate::ConfigSet).
pub trait Source {
    /// Values to merge, in order.
    fn values(&self) -> &[Value];

    /// Errors met while producing the values.
    fn errors(&self) -> &[PathfigError];

    /// Move the recorded errors out, leaving none behind.
    fn take_errors(&mut self) -> Vec<PathfigError>;
}

/// A text format a [`Loader`] can parse.
pub trait Format {
    /// Name used in parse errors.
    const NAME: &'static str;

    fn parse(text: &str) -> Result<Value, PathfigError>;
}

/// Collects values parsed from strings, bytes, readers or files.
pub struct Loader<F> {
    values: Vec<Value>,
    errors: Vec<PathfigError>,
    format: PhantomData<F>,
}

impl<F: Format> Loader<F> {
    pub fn new() -> Self {
        Loader {
            values: Vec::new(),
            errors: Vec::new(),
            format: PhantomData,
        }
    }

    pub fn from_str(self, text: &str) -> Self {
        self.record(F::parse(text))
    }

    pub fn from_bytes(self, bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.from_str(text),
            Err(err) => self.record(Err(PathfigError::Parse {
                format: F::NAME,
                reason: err.to_string(),
            })),
        }
    }

    pub fn from_reader(self, mut reader: impl Read) -> Self {
        let mut bytes = Vec::new();
        match reader.read_to_end(&mut bytes) {
            Ok(_) => self.from_bytes(&bytes),
            Err(err) => self.record(Err(PathfigError::Read(err))),
        }
    }

    /// Read and parse the file at `path`. A missing file is an error.
    pub fn from_file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        debug!(path = %path.display(), format = F::NAME, "reading config file");
        match std::fs::read(path) {
            Ok(bytes) => self.from_bytes(&bytes),
            Err(source) => self.record(Err(PathfigError::Io {
                path: path.to_path_buf(),
                source,
            })),
        }
    }

    pub(crate) fn record(mut self, parsed: Result<Value, PathfigError>) -> Self {
        match parsed {
            Ok(value) => self.values.push(value),
            Err(err) => self.errors.push(err),
        }
        self
    }
}

impl<F: Format> Default for Loader<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Format> fmt::Debug for Loader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("format", &F::NAME)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .finish()
    }
}

impl<F> Source for Loader<F> {
    fn values(&self) -> &[Value] {
        &self.values
    }

    fn errors(&self) -> &[PathfigError] {
        &self.errors
    }

    fn take_errors(&mut self) -> Vec<PathfigError> {
        std::mem::take(&mut self.errors)
    }
}

/// A single value built in code is a source with nothing to fail.
impl Source for Value {
    fn values(&self) -> &[Value] {
        std::slice::from_ref(self)
    }

    fn errors(&self) -> &[PathfigError] {
        &[]
    }

    fn take_errors(&mut self) -> Vec<PathfigError> {
        Vec::new()
    }
}
