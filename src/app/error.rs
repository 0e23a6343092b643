use thiserror::Error;

/// Number of characters kept from an offending response body.
pub const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum EncyclopediaError {
    #[error("Article \"{0}\" not found in local database")]
    NotFound(String),

    #[error("Article title is empty")]
    EmptyTitle,

    #[error("HTTP {status}: {body_preview}")]
    Http { status: u16, body_preview: String },

    #[error("Malformed response ({detail}): {body_preview}")]
    MalformedResponse { detail: String, body_preview: String },

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Failed to load \"{title}\": {}", .attempts.join("; "))]
    Unresolved { title: String, attempts: Vec<String> },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EncyclopediaError {
    pub fn http(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            body_preview: body_preview(body),
        }
    }

    pub fn malformed(detail: impl Into<String>, body: &str) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
            body_preview: body_preview(body),
        }
    }
}

impl From<reqwest::Error> for EncyclopediaError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// First [`BODY_PREVIEW_CHARS`] characters of a body, cut on a char boundary.
pub fn body_preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

pub type Result<T> = std::result::Result<T, EncyclopediaError>;
