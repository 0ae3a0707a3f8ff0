//! Facade crate for Catmash features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `catmash` with the `server` feature.
//! - Call [`init`] to load every feature slice before building the API state.

pub use catmash_content as content;
pub use catmash_domain as domain;
pub use catmash_kernel as kernel;

use catmash_content::ContentSource;
use catmash_domain::config::ApiConfig;
use std::sync::Arc;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use catmash_arena::api::router as arena_router;
        pub use catmash_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use catmash_arena as arena;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "arena",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all features. The arena loads its cats from `source` before returning.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub async fn init(
    config: &ApiConfig,
    source: Arc<dyn ContentSource>,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Arena
    slices.push(features::arena::init(config, source).await?);

    Ok(slices)
}
