use thiserror::Error;

/// Failures a tool handler can report back to the host.
///
/// None of these escape the dispatch boundary as protocol errors; the adapter
/// renders them as text prefixed with `Error: `.
#[derive(Error, Debug)]
pub enum DocsError {
    #[error("{what} not found in {repository}")]
    NotFound { what: String, repository: String },

    #[error("GitHub API returned status {status} for {what} in {repository}")]
    Status {
        status: u16,
        what: String,
        repository: String,
    },

    #[error("{path} is not a file (type: {kind})")]
    WrongType { path: String, kind: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to fetch article from {url}: {reason}")]
    ArticleFetch { url: String, reason: String },

    #[error("README not found in {repository} (tried multiple branches and filenames)")]
    ReadmeNotFound { repository: String },

    #[error("malformed upstream payload: {0}")]
    Malformed(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

pub type Result<T> = std::result::Result<T, DocsError>;
