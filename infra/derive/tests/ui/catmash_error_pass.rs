use catmash_derive::catmash_error;
use std::borrow::Cow;

#[catmash_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Empty pool{}: {message}", format_context(.context))]
    EmptyPool { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: DemoError = "unexpected".into();
    let _ = Err::<(), _>(err).context("ui test");
}
