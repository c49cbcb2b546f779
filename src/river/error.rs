use thiserror::Error;

/// Everything that can go wrong while fetching or decoding a manifest or a
/// river.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{location} returned HTTP {status}")]
    Status { location: String, status: u16 },

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {what}: {message}")]
    Parse { what: &'static str, message: String },

    #[error("invalid location {0:?}")]
    InvalidLocation(String),
}

impl FetchError {
    pub fn parse(what: &'static str, message: impl ToString) -> Self {
        Self::Parse {
            what,
            message: message.to_string(),
        }
    }
}
