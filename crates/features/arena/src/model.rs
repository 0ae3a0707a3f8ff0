use catmash_derive::api_model;
use std::fmt;

#[api_model]
#[derive(Clone, PartialEq, Eq)]
/// A contestant
pub struct Cat {
    /// Stable identifier from the content provider
    pub id: String,
    pub title: String,
    /// Image URL
    pub image: String,
    /// Current ELO rating
    #[serde(rename = "elo")]
    pub rating: i32,
}

#[api_model(deny_unknown_fields = false)]
/// Outcome of one round
pub struct MatchRequest {
    pub winner_id: String,
    pub loser_id: String,
}

#[api_model]
/// Updated winner and the cat it faces next
pub struct MatchResponse {
    pub winner: Cat,
    pub new_opponent: Cat,
}

#[api_model]
pub struct ReloadResponse {
    pub message: String,
}

/// What a merge did to the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Cats present before and after, rating carried over.
    pub kept: usize,
    /// Cats seen for the first time.
    pub added: usize,
    /// Cats no longer published.
    pub dropped: usize,
}

impl MergeReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.kept + self.added
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded {} cats ({} kept, {} added, {} dropped)",
            self.total(),
            self.kept,
            self.added,
            self.dropped
        )
    }
}
