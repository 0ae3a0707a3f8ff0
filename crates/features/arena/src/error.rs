use catmash_content::ContentError;
use std::borrow::Cow;

#[catmash_derive::catmash_error]
pub enum ArenaError {
    #[error("Cat not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("A cat cannot play against itself{}: {message}", format_context(.context))]
    SelfMatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Fewer cats than the request needs.
    #[error("Not enough cats to pick from{}", format_context(.context))]
    EmptyPool { context: Option<Cow<'static, str>> },

    #[error("Content sync failed{}: {source}", format_context(.context))]
    Sync { source: ContentError, context: Option<Cow<'static, str>> },

    #[error("Internal arena error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<ArenaError> for catmash_kernel::server::ApiError {
    fn from(err: ArenaError) -> Self {
        let message = err.to_string();
        match err {
            ArenaError::NotFound { .. } | ArenaError::SelfMatch { .. } => Self::bad_request(message),
            ArenaError::EmptyPool { .. } => Self::conflict(message),
            ArenaError::Sync { .. } | ArenaError::Internal { .. } => Self::internal(message),
        }
    }
}
