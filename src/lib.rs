//! Fill typed Rust values from layered, path-addressed configuration trees.
//!
//! pathfig loads one or more sources (JSON, TOML, YAML, dotenv files, the
//! process environment, or values built in code) into a single merged tree,
//! then decodes that tree into your structs. Each field says *where* its
//! value lives with a path annotation:
//!
//! ```ignore
//! use pathfig::{ConfigSet, Decode, JsonLoader, LoadOptions};
//!
//! #[derive(Decode, Default)]
//! struct Server {
//!     #[pathfig(cfg = "server.host,default=localhost")]
//!     host: String,
//!     #[pathfig(cfg = "server.port,required")]
//!     port: u16,
//!     #[pathfig(cfg = "server.timeout")]
//!     timeout: std::time::Duration,
//! }
//!
//! let mut config = ConfigSet::new();
//! config.load(JsonLoader::new().from_file("server.json"), LoadOptions::default())?;
//!
//! let mut server = Server::default();
//! config.decode(&mut server)?;
//! ```
//!
//! # The tree
//!
//! Every source is normalized into a [`Value`]: null, bool, integer, float,
//! string, datetime, list or map. Loads merge into the [`ConfigSet`]'s root:
//!
//! - An empty root is replaced by the loaded value.
//! - Map into map is a **shallow** key union; the later load wins a conflict.
//! - List into list appends.
//! - Anything else is [`PathfigError::IncompatibleMerge`].
//!
//! [`LoadOptions::prefix`] merges a value under a key path instead of at the
//! root, creating intermediate maps. A load is atomic: if any value fails to
//! merge, or the source reported read/parse errors, the root is unchanged.
//!
//! # Paths
//!
//! Keys are separated by `.`; `[n]` indexes a list; any other bracketed text
//! is a literal key, so `[a.b.c]` addresses the key `"a.b.c"`:
//!
//! ```text
//! database.replicas[0].host
//! features[beta.search].enabled
//! ```
//!
//! [`ConfigSet::get`] resolves a path against the root. Field paths are
//! resolved relative to the value of the enclosing struct.
//!
//! # Field annotations
//!
//! `#[pathfig(cfg = "<path>[,strict][,required][,default=<literal>]")]`
//!
//! - **path**: where the field's value lives, relative to the parent. An
//!   empty path decodes the parent's value itself into the field.
//! - **required**: a missing value is an error.
//! - **default=x**: decode from the literal `x` when the value is missing.
//!   Combining it with `required` is a declaration error.
//! - **strict**: conversion failures in this field are errors even when the
//!   decode as a whole is lenient.
//!
//! A field may carry annotations for several tags
//! (`#[pathfig(cfg = "db.url", env = "DATABASE_URL")]`).
//! [`ConfigSet::with_tag`] picks which one is read, so one struct can be
//! decoded from a nested file and from a flat environment.
//! `#[pathfig(skip)]` leaves a field alone.
//!
//! # Strict and lenient decoding
//!
//! [`ConfigSet::decode`] is lenient: a value that fails to convert leaves its
//! field untouched, and collection elements that fail are omitted.
//! [`ConfigSet::strict_decode`] stops at the first failure and reports the
//! field path. Some failures are fatal either way: missing required fields,
//! `required` + `default` conflicts, shape mismatches for collections, and
//! errors from `custom` or `from_str` decoders.
//!
//! Both return the number of fields set. A decode that sets nothing at all
//! fails with [`PathfigError::NoFieldsSet`], which usually means a wrong
//! prefix or a forgotten load.
//!
//! # Supported types
//!
//! - `bool`, `char`, `String`, all integer and float types. Text is parsed,
//!   so `"8080"` fills a `u16`; integers accept `0x`, `0o`, `0b` and `_`.
//! - [`std::time::Duration`] from literals like `"1h30m"` or `"250ms"`.
//! - IP addresses, [`url::Url`], `chrono::DateTime<FixedOffset | Utc>` (RFC
//!   3339), and raw `serde_json::Value` / [`Value`] subtrees.
//! - `Option<T>`, `Box<T>`, `Vec<T>` (from a list or a `;`-separated
//!   string), `HashMap<K, V>` and `BTreeMap<K, V>` with decodable keys.
//! - Your own structs via `#[derive(Decode)]`, and any type through
//!   `#[pathfig(custom)]` ([`CustomDecode`]) or `#[pathfig(from_str)]`.
//!
//! # Features
//!
//! `toml`, `yaml` and `env` (all on by default) enable the matching loaders.
//! JSON is always available.
//!
//! # Diagnostics
//!
//! pathfig emits [`tracing`](https://docs.rs/tracing) events: `debug` for
//! loads and decode totals, `trace` for skipped and absent fields. Install a
//! subscriber to see them.

// Lets the derive's `::pathfig::` paths resolve inside this crate's own tests.
extern crate self as pathfig;

pub mod decode;
pub mod error;
pub mod path;
pub mod source;
pub mod tag;
pub mod value;

mod config_set;
mod merge;
mod options;

#[cfg(test)]
mod fixtures;

pub use config_set::{ConfigSet, DEFAULT_TAG};
pub use decode::{Context, CustomDecode, Decode};
pub use error::{BoxError, PathfigError};
pub use options::{DecodeOptions, LoadOptions};
pub use pathfig_macros::Decode;
pub use source::{Format, Json, JsonLoader, Loader, Source};
#[cfg(feature = "env")]
pub use source::{Env, EnvLoader};
#[cfg(feature = "toml")]
pub use source::{Toml, TomlLoader};
#[cfg(feature = "yaml")]
pub use source::{Yaml, YamlLoader};
pub use tag::FieldPolicy;
pub use value::{Map, Value};
