use crate::http::parser::ParseError;

/// A failed downstream fetch.
///
/// Every variant means the same thing to callers: the downstream was
/// unavailable or failed. The variants only record where it went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("failed to connect to downstream {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("downstream i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed downstream response: {0}")]
    Malformed(#[source] ParseError),

    #[error("downstream closed the connection before a complete response")]
    Closed,

    #[error("downstream response head too large")]
    HeadTooLarge,
}

impl From<ParseError> for ForwardError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::HeadTooLarge => ForwardError::HeadTooLarge,
            other => ForwardError::Malformed(other),
        }
    }
}
