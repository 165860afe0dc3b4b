use serde::{Deserialize, Serialize};

/// Parameters describing what page to capture and how.
///
/// Every field is optional. Fields that are `None` or empty are left out of
/// the outgoing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullpage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(rename = "accept_lang", skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,
}

impl CaptureRequest {
    /// A request with only the target URL set.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Query parameters in a fixed order, paired with their values.
    pub(crate) fn params(&self) -> [(&'static str, Option<&str>); 14] {
        [
            ("url", self.url.as_deref()),
            ("fullpage", self.fullpage.as_deref()),
            ("width", self.width.as_deref()),
            ("viewport", self.viewport.as_deref()),
            ("format", self.format.as_deref()),
            ("secret_key", self.secret_key.as_deref()),
            ("css_url", self.css_url.as_deref()),
            ("delay", self.delay.as_deref()),
            ("ttl", self.ttl.as_deref()),
            ("force", self.force.as_deref()),
            ("placeholder", self.placeholder.as_deref()),
            ("user_agent", self.user_agent.as_deref()),
            ("accept_lang", self.accept_language.as_deref()),
            ("export", self.export.as_deref()),
        ]
    }

    /// Parameters that will actually be sent.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params()
            .into_iter()
            .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
    }
}

/// Connection settings for the capture API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base endpoint. Falls back to [`DEFAULT_API_ENDPOINT`](super::DEFAULT_API_ENDPOINT).
    pub endpoint: Option<String>,
    pub access_key: String,
    /// Force the `https` scheme whatever the endpoint says.
    pub https: bool,
}

impl ClientConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            ..Default::default()
        }
    }
}

/// Error details reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub code: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub info: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: ApiError,
}

/// What a capture response turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureResult {
    Image(Vec<u8>),
    Failure(ApiError),
}
