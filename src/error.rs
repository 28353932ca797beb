// Error types for apirecon

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("unable to parse {source_name} as JSON or YAML")]
    Decode { source_name: String },

    #[error("failed to prepare output directory {path}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid proxy URL: {0}")]
    InvalidProxy(String),

    #[error("unknown auth type: {0} (expected bearer, apiKey or basic)")]
    UnknownAuthType(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;
