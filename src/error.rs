use arrow::error::ArrowError;
use reqwest::StatusCode;
use thiserror::Error;

/// The source data could not be obtained. Every variant carries its cause.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("could not parse CSV: {0}")]
    Parse(#[from] ArrowError),
}

impl DataUnavailable {
    /// Short machine-readable tag, used in logs and the JSON view.
    pub fn kind(&self) -> &'static str {
        match self {
            DataUnavailable::Request { .. } => "request",
            DataUnavailable::Status { .. } => "status",
            DataUnavailable::Decode(_) => "decode",
            DataUnavailable::Parse(_) => "parse",
        }
    }
}
