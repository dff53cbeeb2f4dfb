/// Per-field decode policy, parsed from an annotation such as
/// `"database.url,required"` or `"port,default=8080"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Path relative to the parent's value. Empty means the parent's value itself.
    pub path: String,
    pub required: bool,
    pub strict: bool,
    /// Raw fallback used when the path cannot be resolved.
    pub default: Option<String>,
}

impl FieldPolicy {
    /// Parse `<path>[,strict][,required][,default=<literal>]`.
    ///
    /// Unknown flags are ignored. The default literal cannot contain a comma.
    pub fn parse(annotation: &str) -> Self {
        if annotation.is_empty() {
            return Self::default();
        }

        let mut parts = annotation.split(',');
        let mut policy = FieldPolicy {
            path: parts.next().unwrap_or_default().to_string(),
            ..Self::default()
        };

        for part in parts {
            match part {
                "strict" => policy.strict = true,
                "required" => policy.required = true,
                _ => {
                    if let Some(literal) = part.strip_prefix("default=") {
                        policy.default = Some(literal.to_string());
                    }
                }
            }
        }

        policy
    }

    /// Policy for a top-level or prefixed decode.
    pub fn at(path: impl Into<String>, strict: bool) -> Self {
        FieldPolicy {
            path: path.into(),
            strict,
            ..Self::default()
        }
    }
}
