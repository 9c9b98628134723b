//! Portal configuration.
//!
//! Loaded via the `config` crate from an optional TOML file, then environment
//! variables prefixed with `BANK_PORTAL__` (nested keys separated by `__`,
//! e.g. `BANK_PORTAL__BACKEND__BASE_URL`). Every field has a default.

use std::path::Path;

use bank_portal_http::BackendConfig;
use bank_portal_session::NavigationConfig;
use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BANK_PORTAL";

/// Portal configuration composed from library configs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortalConfig {
    /// Bank API connection.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Views the session core redirects to.
    #[serde(default)]
    pub navigation: NavigationConfig,
}

impl PortalConfig {
    /// Loads configuration from `path` (if given) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed, or a value has
    /// the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with(path, environment())
    }

    fn load_with(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
