/// Options for [`ConfigSet::load`](crate::ConfigSet::load) and
/// [`ConfigSet::load_value`](crate::ConfigSet::load_value).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub(crate) prefix: String,
}

impl LoadOptions {
    /// Merge the loaded values under `prefix` instead of at the root.
    ///
    /// The prefix is a path of keys (`"services.api"`, `"[a.b]"`); missing
    /// maps along it are created.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Options for [`ConfigSet::decode_with`](crate::ConfigSet::decode_with).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub(crate) strict: bool,
    pub(crate) prefix: String,
}

impl DecodeOptions {
    /// Fail on the first field that cannot be converted instead of skipping it.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Decode from the value at `prefix` instead of the root.
    pub fn from_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}
