//! Shared constants.

/// `OpenAPI` tag for infrastructure endpoints.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for the game endpoints.
pub const ARENA_TAG: &str = "Arena";

/// Rating every cat starts with.
pub const DEFAULT_RATING: i32 = 1200;
/// Maximum rating swing per match.
pub const DEFAULT_K_FACTOR: f64 = 32.0;
/// Entries returned by the leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// Prefix of the layered configuration environment variables (`CATMASH__SERVER__PORT`).
pub const ENV_PREFIX: &str = "CATMASH";
/// Content provider secrets read from the plain environment.
pub const MANAGEMENT_KEY_ENV: &str = "MANAGEMENT_KEY";
pub const DELIVERY_KEY_ENV: &str = "DELIVERY_KEY";
pub const API_KEY_ENV: &str = "API_KEY";
