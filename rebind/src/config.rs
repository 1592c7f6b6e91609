//! The [`config`](self) module implements [`Config`], the settings of a
//! [`Session`](crate::Session).

use std::env::var;

use tracing::warn;

/// Environment variable that overrides [`Config::verify_on_drop`].
pub const ENV_VERIFY_ON_DROP: &str = "REBIND_VERIFY_ON_DROP";

/// Environment variable that overrides [`Config::alias_prefix`].
pub const ENV_ALIAS_PREFIX: &str = "REBIND_ALIAS_PREFIX";

/// Settings of a [`Session`](crate::Session).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    /// Verify all points when a [`Scope`](crate::Scope) is dropped and panic on
    /// violations. If disabled the scope only resets.
    pub verify_on_drop: bool,

    /// Prefix of the reserved name original implementations are kept under
    /// while a point is bound.
    pub alias_prefix: String,
}

impl Config {
    #[must_use]
    pub fn verify_on_drop(mut self, value: bool) -> Self {
        self.verify_on_drop = value;

        self
    }

    #[must_use]
    pub fn alias_prefix<S: Into<String>>(mut self, value: S) -> Self {
        self.alias_prefix = value.into();

        self
    }

    /// Default config with the overrides from the environment applied.
    ///
    /// Invalid values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = var(ENV_VERIFY_ON_DROP) {
            match parse_bool(&value) {
                Some(value) => config.verify_on_drop = value,
                None => warn!(variable = ENV_VERIFY_ON_DROP, %value, "ignoring invalid boolean"),
            }
        }

        if let Ok(value) = var(ENV_ALIAS_PREFIX) {
            if value.is_empty() {
                warn!(variable = ENV_ALIAS_PREFIX, "ignoring empty alias prefix");
            } else {
                config.alias_prefix = value;
            }
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verify_on_drop: true,
            alias_prefix: "__rebind_original_".into(),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
