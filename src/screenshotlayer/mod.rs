pub mod error;
pub mod types;

use std::env::consts;

use reqwest::Url;
use tracing::{debug, warn};

pub use self::error::{Error, Result};
pub use self::types::{ApiError, CaptureRequest, CaptureResult, ClientConfig, ErrorEnvelope};

pub const DEFAULT_API_ENDPOINT: &str = "http://api.screenshotlayer.com/api/capture";

/// Content type the service uses for error envelopes. Anything else is
/// treated as image data.
pub const ERROR_CONTENT_TYPE: &str = "application/json; Charset=UTF-8";

impl ClientConfig {
    /// Resolve the base endpoint: default when unset, `https` when requested.
    pub fn resolve(&self) -> Result<Url> {
        let endpoint = match self.endpoint.as_deref() {
            Some(endpoint) if !endpoint.is_empty() => endpoint,
            _ => DEFAULT_API_ENDPOINT,
        };

        let mut url = Url::parse(endpoint).map_err(|e| Error::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if self.https && url.set_scheme("https").is_err() {
            return Err(Error::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "scheme cannot be changed to https".to_string(),
            });
        }

        Ok(url)
    }
}

/// Build the full capture URL for `request`.
pub fn build_url(config: &ClientConfig, request: &CaptureRequest) -> Result<Url> {
    let base = config.resolve()?;

    Ok(encode_query(base, &config.access_key, request))
}

fn encode_query(mut url: Url, access_key: &str, request: &CaptureRequest) -> Url {
    url.set_query(None);

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("access_key", access_key);

        for (name, value) in request.query_pairs() {
            query.append_pair(name, value);
        }
    }

    url
}

/// Decide whether `body` is an error envelope or image data.
///
/// This only looks at the declared content type; the bytes themselves are
/// never sniffed.
pub fn classify(content_type: Option<&str>, body: Vec<u8>) -> Result<CaptureResult> {
    if content_type != Some(ERROR_CONTENT_TYPE) {
        return Ok(CaptureResult::Image(body));
    }

    let envelope: ErrorEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(source) => {
            return Err(Error::Decode {
                source,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    };

    if envelope.success {
        warn!("API returned a success envelope without image data");

        return Ok(CaptureResult::Image(Vec::new()));
    }

    Ok(CaptureResult::Failure(envelope.error))
}

pub struct Client {
    client: reqwest::Client,
    endpoint: Url,
    access_key: String,
}

impl Client {
    /// Validates the endpoint up front, so a bad one fails here rather than
    /// on the first capture.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.resolve()?;

        let client = reqwest::Client::builder()
            .user_agent(format!(
                "{}/{} on {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                consts::OS
            ))
            .build()?;

        debug!(
            host = endpoint.host_str().unwrap_or_default(),
            path = endpoint.path(),
            "Configured capture endpoint"
        );

        Ok(Self {
            client,
            endpoint,
            access_key: config.access_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The URL a capture of `request` would hit.
    pub fn url_for(&self, request: &CaptureRequest) -> Url {
        encode_query(self.endpoint.clone(), &self.access_key, request)
    }

    /// Capture a screenshot and return the raw image bytes.
    pub async fn capture(&self, request: &CaptureRequest) -> Result<Vec<u8>> {
        let response = self.client.get(self.url_for(request)).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        debug!(%status, content_type = ?content_type, "Capture response received");

        let response = if content_type.as_deref() == Some(ERROR_CONTENT_TYPE) {
            response
        } else {
            response.error_for_status()?
        };

        let bytes = response.bytes().await?;

        match classify(content_type.as_deref(), bytes.to_vec())? {
            CaptureResult::Image(image) => Ok(image),
            CaptureResult::Failure(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("secret")
    }

    fn query_names(url: &Url) -> Vec<String> {
        url.query_pairs().map(|(name, _)| name.into_owned()).collect()
    }

    #[test]
    fn url_only_request_sends_key_and_url() {
        let url = build_url(&config(), &CaptureRequest::new("https://example.com")).unwrap();

        assert_eq!(query_names(&url), vec!["access_key", "url"]);
        assert_eq!(
            url.as_str(),
            "http://api.screenshotlayer.com/api/capture?access_key=secret&url=https%3A%2F%2Fexample.com"
        );
    }

    #[test]
    fn empty_fields_are_omitted() {
        let request = CaptureRequest {
            url: Some("https://example.com".to_string()),
            fullpage: Some(String::new()),
            delay: Some(String::new()),
            ttl: Some("3600".to_string()),
            export: Some(String::new()),
            ..Default::default()
        };

        let url = build_url(&config(), &request).unwrap();

        assert_eq!(query_names(&url), vec!["access_key", "url", "ttl"]);
    }

    #[test]
    fn all_fields_in_table_order() {
        let request = CaptureRequest {
            url: Some("a".into()),
            fullpage: Some("1".into()),
            width: Some("b".into()),
            viewport: Some("c".into()),
            format: Some("d".into()),
            secret_key: Some("e".into()),
            css_url: Some("f".into()),
            delay: Some("g".into()),
            ttl: Some("h".into()),
            force: Some("i".into()),
            placeholder: Some("j".into()),
            user_agent: Some("k".into()),
            accept_language: Some("l".into()),
            export: Some("m".into()),
        };

        let url = build_url(&config(), &request).unwrap();

        assert_eq!(
            query_names(&url),
            vec![
                "access_key",
                "url",
                "fullpage",
                "width",
                "viewport",
                "format",
                "secret_key",
                "css_url",
                "delay",
                "ttl",
                "force",
                "placeholder",
                "user_agent",
                "accept_lang",
                "export",
            ]
        );
    }

    #[test]
    fn https_flag_overrides_scheme() {
        for endpoint in [None, Some("http://localhost:8080/capture"), Some("https://x.test/api")] {
            let config = ClientConfig {
                endpoint: endpoint.map(str::to_string),
                https: true,
                ..config()
            };

            let url = build_url(&config, &CaptureRequest::default()).unwrap();

            assert_eq!(url.scheme(), "https");
        }
    }

    #[test]
    fn empty_endpoint_uses_default() {
        let config = ClientConfig {
            endpoint: Some(String::new()),
            ..config()
        };

        assert_eq!(config.resolve().unwrap().as_str(), DEFAULT_API_ENDPOINT);
    }

    #[test]
    fn existing_query_is_replaced() {
        let config = ClientConfig {
            endpoint: Some("http://localhost/capture?stale=1".to_string()),
            ..config()
        };

        let url = build_url(&config, &CaptureRequest::default()).unwrap();

        assert_eq!(url.query(), Some("access_key=secret"));
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let config = ClientConfig {
            endpoint: Some("not a url".to_string()),
            ..config()
        };

        assert!(matches!(
            build_url(&config, &CaptureRequest::default()),
            Err(Error::InvalidEndpoint { .. })
        ));
        assert!(matches!(Client::new(&config), Err(Error::InvalidEndpoint { .. })));
    }

    #[test]
    fn resolving_does_not_touch_config() {
        let config = ClientConfig {
            https: true,
            ..config()
        };
        let before = config.clone();

        config.resolve().unwrap();

        assert_eq!(config, before);
    }

    #[test]
    fn client_url_matches_build_url() {
        let request = CaptureRequest::new("https://example.com");
        let client = Client::new(&config()).unwrap();

        assert_eq!(client.url_for(&request), build_url(&config(), &request).unwrap());
    }

    #[test]
    fn classify_error_envelope() {
        let body = br#"{"success":false,"error":{"code":101,"type":"missing_access_key","info":"No key."}}"#;

        let result = classify(Some(ERROR_CONTENT_TYPE), body.to_vec()).unwrap();

        assert_eq!(
            result,
            CaptureResult::Failure(ApiError {
                code: 101,
                kind: "missing_access_key".to_string(),
                info: "No key.".to_string(),
            })
        );
    }

    #[test]
    fn classify_passes_image_bytes_through() {
        let png = b"\x89PNG\r\n\x1a\n\x00\x00".to_vec();

        for content_type in [Some("image/png"), Some("application/json"), None] {
            let result = classify(content_type, png.clone()).unwrap();

            assert_eq!(result, CaptureResult::Image(png.clone()));
        }
    }

    #[test]
    fn classify_undecodable_envelope() {
        let error = classify(Some(ERROR_CONTENT_TYPE), b"<html>oops</html>".to_vec()).unwrap_err();

        match error {
            Error::Decode { body, .. } => assert_eq!(body, "<html>oops</html>"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn classify_success_envelope_has_no_image() {
        let result = classify(Some(ERROR_CONTENT_TYPE), br#"{"success":true}"#.to_vec()).unwrap();

        assert_eq!(result, CaptureResult::Image(Vec::new()));
    }
}
