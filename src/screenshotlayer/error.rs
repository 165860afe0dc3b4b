use thiserror::Error;

use super::types::ApiError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The configured endpoint is not a valid URL. Not retryable.
    #[error("Invalid API endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response claimed to be JSON but could not be parsed.
    #[error("Failed to parse response: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("API responded with {code} ({kind}). {info}")]
    Service { code: i64, kind: String, info: String },
}

impl Error {
    pub fn is_service(&self) -> bool {
        matches!(self, Error::Service { .. })
    }

    /// The service-reported error, if this is one.
    pub fn api_error(&self) -> Option<ApiError> {
        match self {
            Error::Service { code, kind, info } => Some(ApiError {
                code: *code,
                kind: kind.clone(),
                info: info.clone(),
            }),
            _ => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        Error::Service {
            code: error.code,
            kind: error.kind,
            info: error.info,
        }
    }
}
