//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading plus, behind the `server`
//! feature, the API state, the error-to-response mapping and system endpoints.
//!
//! ## Config loading
//! ```rust,no_run
//! use catmash_kernel::config::load_config;
//! use catmash_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server")).unwrap();
//! ```
pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

pub use catmash_domain as domain;
