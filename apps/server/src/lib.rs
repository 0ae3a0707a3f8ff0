//! # Catmash Server
//!
//! Axum web server hosting the cat ranking game: JSON API, `OpenAPI` docs and the
//! static game client.
//!
//! ## Example
//! ```no_run
//! use catmash_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(8080)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum_server::Handle;
use catmash::domain::config::{ApiConfig, LoggingConfig};
use catmash::kernel::config::validate;
use catmash::kernel::server::{ApiState, ApiStateBuilder};
use catmash_content::{ContentClient, ContentSource};
use catmash_logger::{LevelFilter, Logger};
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
    source: Option<Arc<dyn ContentSource>>,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Replaces the content provider client built from the `content` section.
    pub fn source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.source = Some(source);
        self
    }

    fn content_source(&self) -> Result<Arc<dyn ContentSource>> {
        if let Some(source) = &self.source {
            return Ok(Arc::clone(source));
        }

        validate(&self.cfg).context("Configuration is invalid")?;
        let client = ContentClient::from_config(&self.cfg.content)
            .context("Failed to create content provider client")?;
        Ok(Arc::new(client))
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Builds the content provider client (unless a source was supplied)
    /// 2. Initializes the feature slices, which loads the first batch of cats
    /// 3. Constructs application state
    ///
    /// # Errors
    /// Returns an error if:
    /// * A provider credential is missing
    /// * The initial cat sync fails (unreachable provider, bad status, malformed payload)
    pub async fn build(self) -> Result<Server> {
        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(address = %address, "Initializing server");

        let source = self.content_source()?;
        let slices = catmash::init(&self.cfg, source)
            .await
            .map_err(|e| anyhow!("Platform bootstrap failed: {e}"))?;

        let state = slices
            .into_iter()
            .fold(ApiState::builder().config(self.cfg), ApiStateBuilder::register_slice)
            .build()
            .context("Failed to finalize API state registry")?;

        Ok(Server { state })
    }
}

impl fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("cfg", &self.cfg)
            .field("source", &self.source.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete application router, ready to be served.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let app = self.router();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        info!("Starting HTTP server on http://{address}");

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Installs the global logger described by the `logging` section.
///
/// # Errors
/// Returns an error for an unknown level or if the subscriber cannot be installed.
pub fn init_logger(cfg: &LoggingConfig) -> Result<Logger> {
    let level: LevelFilter =
        cfg.level.parse().with_context(|| format!("Unknown log level '{}'", cfg.level))?;
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).json(cfg.json);

    let logger = match &cfg.directory {
        Some(dir) => builder.path(dir).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
