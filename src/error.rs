use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by [`CustomDecode`](crate::CustomDecode) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PathfigError {
    // -- path resolution ------------------------------------------------------
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot get key '{key}' from non-map value ({found})")]
    NotAMapping { key: String, found: &'static str },

    #[error("Cannot get index {index} from non-list value ({found})")]
    NotAList { index: usize, found: &'static str },

    // -- loading --------------------------------------------------------------
    #[error("Value cannot be null")]
    NullValue,

    #[error("Cannot load a {found} value, only maps and lists are supported at the root")]
    UnsupportedRoot { found: &'static str },

    #[error("Cannot merge {incoming} into existing {existing} at '{at}'")]
    IncompatibleMerge {
        at: String,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("Invalid load prefix '{prefix}': only key segments are allowed")]
    InvalidPrefix { prefix: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to parse {format} input: {reason}")]
    Parse { format: &'static str, reason: String },

    #[error("Cannot load config: {}", join_errors(.0))]
    LoadFailed(Vec<PathfigError>),

    // -- decoding -------------------------------------------------------------
    #[error("Invalid {expected} value '{value}': {reason}")]
    InvalidValue {
        expected: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot decode null into {expected}")]
    NullSource { expected: &'static str },

    #[error("Cannot parse timestamp from non-string value ({found})")]
    NonStringTimestamp { found: &'static str },

    #[error("Expected a {expected} at '{path}', found {found}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot unmarshal '{path}' from text: {reason}")]
    Unmarshal { path: String, reason: String },

    #[error("Cannot decode map key '{key}' at '{path}': {source}")]
    MapKey {
        path: String,
        key: String,
        source: Box<PathfigError>,
    },

    #[error("Custom decoder failed at '{path}': {source}")]
    Custom { path: String, source: BoxError },

    #[error("Cannot decode '{path}': {source}")]
    Field {
        path: String,
        source: Box<PathfigError>,
    },

    #[error("Field '{path}' is required: {source}")]
    RequiredField {
        path: String,
        source: Box<PathfigError>,
    },

    #[error("Field '{path}' cannot be both required and have a default value")]
    RequiredWithDefault { path: String },

    // -- policy ---------------------------------------------------------------
    #[error("None of the target fields were set from config values")]
    NoFieldsSet,
}

impl PathfigError {
    /// Whether this is a value conversion failure, the class that non-strict
    /// decoding is allowed to swallow.
    pub fn is_conversion(&self) -> bool {
        match self {
            PathfigError::InvalidValue { .. }
            | PathfigError::NullSource { .. }
            | PathfigError::NonStringTimestamp { .. }
            | PathfigError::UnexpectedShape { .. }
            | PathfigError::Unmarshal { .. }
            | PathfigError::MapKey { .. } => true,
            PathfigError::Field { source, .. } => source.is_conversion(),
            _ => false,
        }
    }

    pub(crate) fn invalid(
        expected: &'static str,
        value: impl ToString,
        reason: impl ToString,
    ) -> Self {
        PathfigError::InvalidValue {
            expected,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn join_errors(errors: &[PathfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
