use thiserror::Error;

/// Failures talking to the node. Every variant is fatal to a poll cycle.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid node URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Request failed with code: {code}, response: {body}")]
    Status { code: u16, body: String },

    #[error("Malformed response to {command}: {source}")]
    Malformed {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Fetch worker panicked")]
    WorkerPanicked,
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(e)
        }
    }
}
