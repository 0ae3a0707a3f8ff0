//! ELO rating updates.

use catmash_domain::constants::DEFAULT_K_FACTOR;

/// Rating engine with a fixed K-factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elo {
    k_factor: f64,
}

impl Default for Elo {
    fn default() -> Self {
        Self::new(DEFAULT_K_FACTOR)
    }
}

impl Elo {
    #[must_use]
    pub const fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }

    /// Probability that a player rated `rating` beats one rated `opponent`.
    #[must_use]
    pub fn expected(rating: i32, opponent: i32) -> f64 {
        1.0 / (1.0 + 10f64.powf((f64::from(opponent) - f64::from(rating)) / 400.0))
    }

    /// New `(winner, loser)` ratings after the winner beat the loser.
    ///
    /// Deltas are truncated toward zero, so 1200 vs 1200 moves by exactly ±16 with K=32.
    #[must_use]
    pub fn update(&self, winner: i32, loser: i32) -> (i32, i32) {
        let expected_winner = Self::expected(winner, loser);
        let expected_loser = Self::expected(loser, winner);

        let winner_delta = (self.k_factor * (1.0 - expected_winner)) as i32;
        let loser_delta = (self.k_factor * (0.0 - expected_loser)) as i32;

        (winner.saturating_add(winner_delta), loser.saturating_add(loser_delta))
    }
}

/// [`Elo::update`] with the standard K-factor of 32.
#[must_use]
pub fn update_ratings(winner: i32, loser: i32) -> (i32, i32) {
    Elo::default().update(winner, loser)
}
