use crate::constants::{
    API_KEY_ENV, DEFAULT_K_FACTOR, DEFAULT_RATING, DELIVERY_KEY_ENV, LEADERBOARD_SIZE,
    MANAGEMENT_KEY_ENV,
};
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level service configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub arena: ArenaConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

/// Content provider endpoint and credentials.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub base_url: String,
    pub content_type: String,
    pub management_key: String,
    pub delivery_key: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl ContentConfig {
    /// Environment names of the credentials that are blank.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            (MANAGEMENT_KEY_ENV, &self.management_key),
            (DELIVERY_KEY_ENV, &self.delivery_key),
            (API_KEY_ENV, &self.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

// Secrets never reach the logs.
impl fmt::Debug for ContentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const REDACTED: &str = "<redacted>";
        f.debug_struct("ContentConfig")
            .field("base_url", &self.base_url)
            .field("content_type", &self.content_type)
            .field("management_key", &REDACTED)
            .field("delivery_key", &REDACTED)
            .field("api_key", &REDACTED)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Rating and leaderboard knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub initial_rating: i32,
    pub k_factor: f64,
    pub leaderboard_size: usize,
}

/// Static assets of the game client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub static_dir: PathBuf,
    pub index_file: String,
}

impl StorageConfig {
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}

/// Logger settings applied by the server binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub directory: Option<PathBuf>,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 80 }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cdn.contentstack.io".to_owned(),
            content_type: "cat".to_owned(),
            management_key: String::new(),
            delivery_key: String::new(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_rating: DEFAULT_RATING,
            k_factor: DEFAULT_K_FACTOR,
            leaderboard_size: LEADERBOARD_SIZE,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { static_dir: PathBuf::from("public"), index_file: "index.html".to_owned() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), json: false, directory: None }
    }
}
