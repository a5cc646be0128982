use ::scraper::error::SelectorErrorKind;

/// All errors that can occur in SportsHub client and pipeline operations.
#[derive(thiserror::Error, Debug)]
pub enum SportsHubError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("{status}{}", detail_suffix(.detail))]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
        detail: Option<String>,
    },

    /// Failed to read the response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A JSON payload could not be encoded or decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// No configuration file exists yet.
    #[error("No configuration found. Please run \"sportshub configure\" first.")]
    NotConfigured,

    /// The configuration file is missing required fields.
    #[error(
        "Incomplete configuration found. Please run \"sportshub configure\" to update your settings."
    )]
    IncompleteConfig,

    /// Filesystem access failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// User supplied input was rejected.
    #[error("{0}")]
    Validation(String),

    /// An address could not be resolved to coordinates.
    #[error("geocoding failed for {address:?}: {reason}")]
    Geocode { address: String, reason: String },

    /// The issue's workflow offers no transition into the requested status.
    #[error("No transition found to status \"{status}\". Available transitions: {available}")]
    NoTransition { status: String, available: String },

    /// The remote service answered successfully but without the expected content.
    #[error("{0}")]
    EmptyResponse(&'static str),
}

impl SportsHubError {
    /// HTTP status attached to this error, if the failure came from a remote API.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SportsHubError::UnexpectedStatus { status, .. } => Some(status.as_u16()),
            SportsHubError::Http { source, .. } | SportsHubError::ResponseBody { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(" - {d}"),
        _ => String::new(),
    }
}

impl<'a> From<SelectorErrorKind<'a>> for SportsHubError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        SportsHubError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SportsHubError>;
