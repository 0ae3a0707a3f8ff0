use crate::entry::{CatEntry, EntriesResponse};
use crate::error::{ContentError, ContentErrorExt};
use async_trait::async_trait;
use catmash_domain::config::ContentConfig;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

const MIN_TIMEOUT_SECONDS: u64 = 1;

/// Anything that can list the cats currently published.
#[async_trait]
pub trait ContentSource: fmt::Debug + Send + Sync {
    /// Lists every published entry. No retries are attempted.
    ///
    /// # Errors
    /// Returns a [`ContentError`] on transport, status or decoding failures.
    async fn fetch_entries(&self) -> Result<Vec<CatEntry>, ContentError>;
}

/// HTTP client of the content delivery API.
pub struct ContentClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ContentClient {
    /// Builds a client from the `content` config section.
    ///
    /// # Errors
    /// * [`ContentError::Config`] if a credential is blank or a value cannot be sent as a header.
    /// * [`ContentError::Http`] if the underlying client cannot be created.
    pub fn from_config(cfg: &ContentConfig) -> Result<Self, ContentError> {
        let missing = cfg.missing_credentials();
        if !missing.is_empty() {
            return Err(ContentError::Config {
                message: format!("missing credentials: {}", missing.join(", ")).into(),
                context: None,
            });
        }

        let timeout_seconds = if cfg.timeout_seconds < MIN_TIMEOUT_SECONDS {
            warn!(
                "Configured timeout_seconds={} is too low; using minimum of {MIN_TIMEOUT_SECONDS} seconds",
                cfg.timeout_seconds
            );
            MIN_TIMEOUT_SECONDS
        } else {
            cfg.timeout_seconds
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .default_headers(default_headers(cfg)?)
            .build()
            .context("Failed to create HTTP client")?;

        let endpoint = format!(
            "{}/v3/content_types/{}/entries",
            cfg.base_url.trim_end_matches('/'),
            cfg.content_type
        );
        info!(endpoint = %endpoint, timeout_seconds, "Content client ready");

        Ok(Self { client, endpoint })
    }

    /// Full URL of the entries listing.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// Provider credentials travel on every request.
fn default_headers(cfg: &ContentConfig) -> Result<HeaderMap, ContentError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in [
        ("authorization", &cfg.management_key),
        ("access_token", &cfg.delivery_key),
        ("api_key", &cfg.api_key),
    ] {
        let mut value = HeaderValue::from_str(value.trim()).map_err(|e| ContentError::Config {
            message: e.to_string().into(),
            context: Some(format!("header {name}").into()),
        })?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    Ok(headers)
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn fetch_entries(&self) -> Result<Vec<CatEntry>, ContentError> {
        debug!(endpoint = %self.endpoint, "Fetching cat entries");

        let response =
            self.client.get(&self.endpoint).send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                context: Some(self.endpoint.clone().into()),
            });
        }

        let body = response.bytes().await.context("Failed to read body")?;
        let entries = serde_json::from_slice::<EntriesResponse>(&body)
            .context("Failed to decode entries")?
            .into_entries();

        debug!(entries = entries.len(), "Fetched cat entries");
        Ok(entries)
    }
}

impl fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentClient").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}
