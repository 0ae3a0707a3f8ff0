use crate::domain::config::ApiConfig;
use crate::domain::constants::{API_KEY_ENV, DELIVERY_KEY_ENV, ENV_PREFIX, MANAGEMENT_KEY_ENV};
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file stem, resolved against the working directory.
const DEFAULT_CONFIG_PATH: &str = "server";

/// Provider secrets and the config keys they populate.
const SECRET_KEYS: [(&str, &str); 3] = [
    (MANAGEMENT_KEY_ENV, "content.management_key"),
    (DELIVERY_KEY_ENV, "content.delivery_key"),
    (API_KEY_ENV, "content.api_key"),
];

/// Errors raised while loading or validating configuration.
#[catmash_derive::catmash_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Missing required credentials{}: {message}", format_context(.context))]
    MissingCredentials { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid config value{}: {message}", format_context(.context))]
    InvalidValue { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Loads configuration from layered sources.
///
/// 1. **File**: `path` if given (must exist), otherwise an optional `server.{toml,yaml,json}`.
/// 2. **Environment**: variables prefixed with `CATMASH__`, nested with `__`
///    (`CATMASH__SERVER__PORT=8080` maps to `server.port`).
/// 3. **Secrets**: `MANAGEMENT_KEY`, `DELIVERY_KEY` and `API_KEY` map onto the
///    matching `content.*` keys and win over the layers above.
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is
/// malformed, or the merged values do not fit `T`.
///
/// # Example
/// ```rust,no_run
/// use catmash_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with(path, |name| std::env::var(name).ok())
}

/// [`load_config`] with an explicit secret lookup instead of the process environment.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with<T, L>(path: Option<impl AsRef<Path>>, lookup: L) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    L: Fn(&str) -> Option<String>,
{
    let explicit = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    let mut builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(explicit))
        .add_source(
            Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true),
        );

    for (env, key) in SECRET_KEYS {
        let value = lookup(env).filter(|v| !v.trim().is_empty());
        if value.is_some() {
            debug!(key, "Applying credential from environment");
        }
        builder = builder.set_override_option(key, value).context("Failed to apply secret")?;
    }

    builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

/// Checks what the process cannot run without. Call before binding any port.
///
/// # Errors
/// * [`ConfigError::InvalidValue`] if `arena.k_factor` is not a positive finite number.
/// * [`ConfigError::MissingCredentials`] naming every blank provider key.
pub fn validate(cfg: &ApiConfig) -> Result<(), ConfigError> {
    let k = cfg.arena.k_factor;
    if !k.is_finite() || k <= 0.0 {
        return Err(ConfigError::InvalidValue {
            message: format!("arena.k_factor must be a positive number, got {k}").into(),
            context: None,
        });
    }

    let missing = cfg.content.missing_credentials();
    if missing.is_empty() {
        return Ok(());
    }

    Err(ConfigError::MissingCredentials {
        message: missing.join(", ").into(),
        context: Some("set them in the environment".into()),
    })
}
