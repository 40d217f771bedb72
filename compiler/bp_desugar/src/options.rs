//! Rewriter configuration.

/// Environment variable overriding [`DesugarOptions::var_prefix`].
pub const VAR_PREFIX_ENV: &str = "BACKPORT_VAR_PREFIX";

/// Options for one rewriting run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesugarOptions {
    /// Prefix for synthetic locals (`__m0`, `__m0_arr`, ...). Must not
    /// collide with names the source program uses.
    pub var_prefix: String,
    /// Walk the output tree after rewriting and reject leftover sugar nodes
    /// or dangling handles.
    pub validate: bool,
}

impl Default for DesugarOptions {
    fn default() -> Self {
        DesugarOptions {
            var_prefix: "__".to_string(),
            validate: cfg!(debug_assertions),
        }
    }
}

impl DesugarOptions {
    /// Defaults, with `var_prefix` taken from `BACKPORT_VAR_PREFIX` when set
    /// to a non-empty value.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(prefix) = std::env::var(VAR_PREFIX_ENV) {
            if !prefix.is_empty() {
                options.var_prefix = prefix;
            }
        }
        options
    }

    /// Builder-style prefix override.
    #[must_use]
    pub fn with_var_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.var_prefix = prefix.into();
        self
    }

    /// Builder-style validation toggle.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

#[cfg(test)]
mod tests;
