//! # Content
//!
//! Client of the content delivery API that publishes the cats. The provider is
//! reached through [`ContentSource`], so callers can swap in another source in tests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use catmash_content::{ContentClient, ContentSource};
//! use catmash_domain::config::ContentConfig;
//!
//! # async fn run(cfg: ContentConfig) -> Result<(), catmash_content::ContentError> {
//! let client = ContentClient::from_config(&cfg)?;
//! for entry in client.fetch_entries().await? {
//!     println!("{} -> {}", entry.title, entry.image);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod entry;
mod error;

pub use crate::client::{ContentClient, ContentSource};
pub use crate::entry::CatEntry;
pub use crate::error::{ContentError, ContentErrorExt};
