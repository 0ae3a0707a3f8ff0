#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Catmash workspace: error enums with context,
//! feature slice handles, API models/handlers and the runtime entry point.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! catmash-derive = { path = "../infra/derive" }
//! ```
//!
//! Examples below are `ignore`d because they need the consuming crates to compile.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime from a profile.
///
/// Turns an `async fn main` returning `Result` into a plain `fn main` that builds
/// a runtime through `catmash_runtime::build_runtime_with_config`.
///
/// # Arguments
///
/// * `high_performance` - Server profile.
/// * `memory_efficient` - Small-footprint profile.
/// * `default` (or nothing) - Worker threads auto-detected.
///
/// # Examples
///
/// ```rust,ignore
/// #[catmash_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro declaring a JSON data model exchanged over the API.
///
/// * Derives `Debug`, `Serialize` and `Deserialize` unless already derived.
/// * Derives `utoipa::ToSchema` when the consuming crate's `server` feature is on.
/// * Applies `#[serde(rename_all = "snake_case")]` unless overridden.
/// * Applies `#[serde(deny_unknown_fields)]` unless `deny_unknown_fields = false`.
///
/// # Example
///
/// ```rust,ignore
/// #[catmash_derive::api_model(deny_unknown_fields = false)]
/// pub struct MatchRequest {
///     pub winner_id: String,
///     pub loser_id: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro wiring an Axum handler into the `OpenAPI` document.
///
/// Arguments are forwarded to `utoipa::path` when the `server` feature is enabled.
///
/// # Example
///
/// ```rust,ignore
/// #[catmash_derive::api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Features
///
/// * Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * Generates a `<Name>Ext` trait with `.context(..)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant carrying a `source` field.
/// * Implements `From<Source>` for those variants, so `?` works on upstream errors.
/// * Implements `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * Emits a module-local `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a `source` must also declare
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[catmash_derive::catmash_error]
/// pub enum ContentError {
///     #[error("HTTP error{}: {source}", format_context(.context))]
///     Http { source: reqwest::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal content error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn catmash_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro defining a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is a cheap `Arc` handle that
/// derefs to it and implements `catmash_kernel::domain::registry::FeatureSlice`.
///
/// # Example
/// ```rust,ignore
/// #[catmash_derive::catmash_slice]
/// pub struct Arena {
///     pub registry: CatRegistry,
/// }
///
/// let arena = Arena::new(ArenaInner { registry });
/// ```
#[proc_macro_attribute]
pub fn catmash_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
