//! Arena feature slice: the cat registry, ELO updates and the game endpoints.
//!
//! The slice owns the [`CatRegistry`] and the [`ContentSource`] it is filled from.
//! Handlers reach it through `ApiState::try_get_slice::<Arena>()`.

#[cfg(feature = "server")]
pub mod api;
mod error;
mod model;
mod rating;
mod registry;

pub use crate::error::{ArenaError, ArenaErrorExt};
pub use crate::model::{Cat, MatchRequest, MatchResponse, MergeReport, ReloadResponse};
pub use crate::rating::{Elo, update_ratings};
pub use crate::registry::CatRegistry;

use catmash_content::{CatEntry, ContentSource};
use catmash_kernel::domain::config::ApiConfig;
use catmash_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;
use tracing::info;

/// Arena feature state
#[catmash_derive::catmash_slice]
pub struct Arena {
    pub registry: CatRegistry,
    pub leaderboard_size: usize,
    source: Arc<dyn ContentSource>,
}

impl Arena {
    /// Empty arena configured from the `arena` section.
    #[must_use]
    pub fn from_config(cfg: &ApiConfig, source: Arc<dyn ContentSource>) -> Self {
        let registry = CatRegistry::new(Elo::new(cfg.arena.k_factor), cfg.arena.initial_rating);
        Self::with_registry(registry, cfg.arena.leaderboard_size, source)
    }

    #[must_use]
    pub fn with_registry(
        registry: CatRegistry,
        leaderboard_size: usize,
        source: Arc<dyn ContentSource>,
    ) -> Self {
        Self::new(ArenaInner { registry, leaderboard_size, source })
    }

    /// Current leaderboard.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<Cat> {
        self.registry.top(self.leaderboard_size)
    }

    /// Pulls the published cats and merges them into the registry.
    ///
    /// The registry is only locked once the fetch has succeeded, so a failed
    /// reload leaves it exactly as it was.
    ///
    /// # Errors
    /// [`ArenaError::Sync`] if the content source fails.
    pub async fn reload(&self) -> Result<MergeReport, ArenaError> {
        let entries = self.source.fetch_entries().await.context("Failed to fetch cats")?;
        let initial = self.registry.initial_rating();
        let fresh = entries.into_iter().map(|entry| into_cat(entry, initial)).collect();

        Ok(self.registry.merge_from_source(fresh))
    }
}

fn into_cat(entry: CatEntry, rating: i32) -> Cat {
    Cat { id: entry.id, title: entry.title, image: entry.image, rating }
}

/// Initialize the arena feature and load the first batch of cats.
///
/// # Errors
/// Returns [`ArenaError::Sync`] if the initial load fails.
pub async fn init(
    cfg: &ApiConfig,
    source: Arc<dyn ContentSource>,
) -> Result<InitializedSlice, ArenaError> {
    let arena = Arena::from_config(cfg, source);
    let report = arena.reload().await.context("Initial cat sync")?;

    info!(cats = report.total(), "Arena slice initialized");
    Ok(InitializedSlice::new(arena))
}
