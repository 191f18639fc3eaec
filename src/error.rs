use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Fatal failures while establishing the operator session.
///
/// Session setup is three sequential gateway round-trips; any of them
/// failing aborts startup, so these carry enough context to tell the
/// operator which step broke.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{context}: empty response from gateway")]
    EmptyResponse { context: &'static str },

    #[error("{context}: {message}")]
    Rejected {
        context: &'static str,
        message: String,
    },

    #[error("{context}: response missing {field}")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },
}

/// Failures reported by the reply submission endpoint.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("reply submission returned empty response")]
    EmptyResponse,

    #[error("reply rejected: {0}")]
    Rejected(String),

    #[error("platform error {code}: {message}")]
    Platform { code: i64, message: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
