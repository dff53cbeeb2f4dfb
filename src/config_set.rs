use tracing::debug;

use crate::decode::{Context, Decode, decode_field};
use crate::error::PathfigError;
use crate::merge;
use crate::options::{DecodeOptions, LoadOptions};
use crate::path;
use crate::source::Source;
use crate::tag::FieldPolicy;
use crate::value::Value;

/// Annotation tag read when none is configured.
pub const DEFAULT_TAG: &str = "cfg";

/// A merged configuration tree plus the annotation tag used to decode it.
///
/// Loads build a new merged document and swap it in, so a failed load leaves
/// the set untouched. Decodes only borrow the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSet {
    root: Value,
    tag: String,
}

impl ConfigSet {
    pub fn new() -> Self {
        Self::with_tag(DEFAULT_TAG)
    }

    /// A set whose decodes read `#[pathfig(<tag> = "...")]` annotations.
    pub fn with_tag(tag: impl Into<String>) -> Self {
        ConfigSet {
            root: Value::Null,
            tag: tag.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The merged tree, `Null` until something is loaded.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a value by path. The empty path returns the root.
    pub fn get(&self, path: &str) -> Result<&Value, PathfigError> {
        path::resolve(&self.root, path)
    }

    /// Merge a value built in code. Only maps and lists are accepted.
    pub fn load_value(
        &mut self,
        value: impl Into<Value>,
        options: LoadOptions,
    ) -> Result<(), PathfigError> {
        self.root = merge::merge(self.root.clone(), value.into(), &options.prefix)?;
        debug!(prefix = %options.prefix, "loaded value");
        Ok(())
    }

    /// Merge every value of `source`, in order.
    ///
    /// Fails with [`PathfigError::LoadFailed`] if the source recorded any
    /// errors. Either every value is merged or none is.
    pub fn load(&mut self, mut source: impl Source, options: LoadOptions) -> Result<(), PathfigError> {
        if !source.errors().is_empty() {
            return Err(PathfigError::LoadFailed(source.take_errors()));
        }

        let merged = source
            .values()
            .iter()
            .try_fold(self.root.clone(), |root, value| {
                merge::merge(root, value.clone(), &options.prefix)
            })?;
        self.root = merged;

        debug!(
            values = source.values().len(),
            prefix = %options.prefix,
            "loaded source"
        );
        Ok(())
    }

    /// Decode into `target`, skipping fields whose values fail to convert.
    ///
    /// Returns the number of fields set; zero is [`PathfigError::NoFieldsSet`].
    pub fn decode<T: Decode>(&self, target: &mut T) -> Result<usize, PathfigError> {
        self.decode_with(target, DecodeOptions::default())
    }

    /// Decode into `target`, failing on the first field that cannot be converted.
    pub fn strict_decode<T: Decode>(&self, target: &mut T) -> Result<usize, PathfigError> {
        self.decode_with(target, DecodeOptions::default().strict())
    }

    pub fn decode_with<T: Decode>(
        &self,
        target: &mut T,
        options: DecodeOptions,
    ) -> Result<usize, PathfigError> {
        let cx = Context::new(&self.tag, options.strict);
        let policy = FieldPolicy::at(options.prefix, options.strict);

        let decoded = decode_field(target, &self.root, &policy, &cx)?;
        debug!(
            tag = %self.tag,
            prefix = %policy.path,
            strict = options.strict,
            fields = decoded,
            "decoded config"
        );

        if decoded == 0 {
            return Err(PathfigError::NoFieldsSet);
        }
        Ok(decoded)
    }
}

impl Default for ConfigSet {
    fn default() -> Self {
        Self::new()
    }
}
