use std::borrow::Cow;

/// Errors raised while talking to the content provider.
#[catmash_derive::catmash_error]
pub enum ContentError {
    /// The client cannot be built from the given settings.
    #[error("Content provider misconfigured{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Transport failure: DNS, connect, TLS, timeout or an interrupted body.
    #[error("Content provider request failed{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Content provider answered with HTTP {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    /// The body is not the expected entries document.
    #[error("Content provider payload is malformed{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
