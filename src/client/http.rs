//! Authenticated JSON client for the config-db HTTP API.

use super::ConfigValue;
use crate::error::{ProviderError, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Characters left verbatim in a path segment: RFC 3986 unreserved.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const JSON: &str = "application/json";

/// How the client treats responses whose status is not 2xx.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any status counts as a delivered response. Non-2xx statuses are logged
    /// and left on the response for the caller to inspect.
    #[default]
    Passthrough,
    /// Non-2xx statuses fail with [`ProviderError::Status`].
    Strict,
}

/// One outbound call: method, API-relative path and optional JSON body.
#[derive(Debug, Clone)]
pub struct RequestSpec<B = ()> {
    /// HTTP method.
    pub method: Method,
    /// Path appended to the client's base URL, starting with `/`.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<B>,
}

impl RequestSpec<()> {
    /// A body-less `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }
}

impl<B: Serialize> RequestSpec<B> {
    /// A request carrying a JSON body.
    pub fn with_body(method: Method, path: impl Into<String>, body: B) -> Self {
        Self {
            method,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// A response as received, before decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decode the body as JSON into `T`.
    ///
    /// A non-2xx response with an empty body decodes to `None`. Every other
    /// body, including an empty one on a 2xx response, must be valid JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.status.is_success() && self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&self.body)
            .map(Some)
            .map_err(|e| ProviderError::Decode(format!("Failed to parse JSON: {}", e)))
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A decoded response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded body; `None` only for an empty non-2xx response.
    pub body: Option<T>,
}

/// Client for the config-db API.
///
/// Holds the API token and base URL; nothing is sent until a request method
/// is called. Cloning is cheap and clones share one connection pool.
///
/// # Examples
///
/// ```rust,no_run
/// use terraform_provider_cdb::client::ConfigClient;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> terraform_provider_cdb::error::Result<()> {
/// let client = ConfigClient::new("secret-token", "https://cdb.example.com");
/// let value = client
///     .get_config_value(&CancellationToken::new(), "prod", "feature_x")
///     .await?;
/// println!("{} = {:?}", value.key, value.typed_value());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigClient {
    token: String,
    base_url: String,
    user_agent: String,
    status_policy: StatusPolicy,
    http: Client,
}

impl ConfigClient {
    /// Create a client with default settings. Performs no I/O.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: normalize_base_url(base_url.into()),
            user_agent: default_user_agent(),
            status_policy: StatusPolicy::default(),
            http: Client::new(),
        }
    }

    /// Create a new builder for constructing a client.
    pub fn builder() -> ConfigClientBuilder {
        ConfigClientBuilder::new()
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The status policy in effect.
    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Send one request and return the undecoded response.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Transport`] if the request cannot be built or sent,
    ///   the URL is malformed, or `cancel` fires before the body is received
    /// - [`ProviderError::Status`] for a non-2xx status under [`StatusPolicy::Strict`]
    pub async fn execute<B: Serialize>(
        &self,
        cancel: &CancellationToken,
        spec: RequestSpec<B>,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, spec.path);
        debug!(method = %spec.method, %url, "sending config-db request");

        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| ProviderError::Transport(format!("Invalid bearer token: {}", e)))?;

        let mut request = self
            .http
            .request(spec.method, &url)
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .header(USER_AGENT, &self.user_agent);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let round_trip = async {
            let response = request
                .send()
                .await
                .map_err(|e| ProviderError::Transport(format!("HTTP request failed: {}", e)))?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await.map_err(|e| {
                ProviderError::Transport(format!("Failed to read response body: {}", e))
            })?;
            Ok::<_, ProviderError>(RawResponse {
                status,
                headers,
                body: body.to_vec(),
            })
        };

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ProviderError::Transport("request cancelled".to_string()));
            }
            result = round_trip => result?,
        };

        if !raw.status.is_success() {
            match self.status_policy {
                StatusPolicy::Strict => {
                    return Err(ProviderError::Status {
                        status: raw.status.as_u16(),
                        body: raw.body_text(),
                    });
                }
                StatusPolicy::Passthrough => {
                    warn!(status = %raw.status, %url, "config-db returned a non-success status");
                }
            }
        }

        Ok(raw)
    }

    /// Send one request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`ConfigClient::execute`] returns, plus
    /// [`ProviderError::Decode`] when the body is not valid JSON for `T`.
    pub async fn do_request<B, T>(
        &self,
        cancel: &CancellationToken,
        spec: RequestSpec<B>,
    ) -> Result<ApiResponse<T>>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let raw = self.execute(cancel, spec).await?;
        let body = raw.decode::<T>()?;
        Ok(ApiResponse {
            status: raw.status,
            headers: raw.headers,
            body,
        })
    }

    /// Fetch the value of `key` in `environment`.
    ///
    /// An empty non-2xx response yields [`ConfigValue::default`].
    pub async fn get_config_value(
        &self,
        cancel: &CancellationToken,
        environment: &str,
        key: &str,
    ) -> Result<ConfigValue> {
        Ok(self
            .get_config_value_response(cancel, environment, key)
            .await?
            .body
            .unwrap_or_default())
    }

    /// Like [`ConfigClient::get_config_value`], keeping the status and headers.
    pub async fn get_config_value_response(
        &self,
        cancel: &CancellationToken,
        environment: &str,
        key: &str,
    ) -> Result<ApiResponse<ConfigValue>> {
        self.do_request(cancel, RequestSpec::get(config_value_path(environment, key)))
            .await
    }
}

impl std::fmt::Debug for ConfigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("status_policy", &self.status_policy)
            .finish()
    }
}

/// Builder for constructing a [`ConfigClient`].
///
/// # Examples
///
/// ```rust,no_run
/// use terraform_provider_cdb::client::{ConfigClient, StatusPolicy};
/// use std::time::Duration;
///
/// # fn example() -> terraform_provider_cdb::error::Result<()> {
/// let client = ConfigClient::builder()
///     .with_token("secret-token")
///     .with_base_url("https://cdb.example.com")
///     .with_status_policy(StatusPolicy::Strict)
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigClientBuilder {
    token: Option<String>,
    base_url: Option<String>,
    user_agent: Option<String>,
    status_policy: StatusPolicy,
    timeout: Option<Duration>,
}

impl ConfigClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            token: None,
            base_url: None,
            user_agent: None,
            status_policy: StatusPolicy::default(),
            timeout: None,
        }
    }

    /// Set the API token sent as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the service base URL, e.g. `https://cdb.example.com`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set how non-2xx responses are treated. Default is passthrough.
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Set a per-request timeout. No timeout is applied unless this is called.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if:
    /// - No token or base URL is provided
    /// - The HTTP client cannot be constructed
    pub fn build(self) -> Result<ConfigClient> {
        let token = self.token.ok_or_else(|| {
            ProviderError::Configuration("token is required for ConfigClient".to_string())
        })?;
        let base_url = self.base_url.ok_or_else(|| {
            ProviderError::Configuration("base URL is required for ConfigClient".to_string())
        })?;

        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(ConfigClient {
            token,
            base_url: normalize_base_url(base_url),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            status_policy: self.status_policy,
            http,
        })
    }
}

impl Default for ConfigClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// API path of one configuration value.
pub fn config_value_path(environment: &str, key: &str) -> String {
    format!(
        "/api/v1/config-values/{}/{}",
        utf8_percent_encode(environment, PATH_SEGMENT),
        utf8_percent_encode(key, PATH_SEGMENT)
    )
}

fn normalize_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

fn default_user_agent() -> String {
    format!("terraform-provider-cdb/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_value_path() {
        assert_eq!(
            config_value_path("prod", "feature_x"),
            "/api/v1/config-values/prod/feature_x"
        );
    }

    #[test]
    fn test_config_value_path_encodes_segments() {
        assert_eq!(
            config_value_path("eu west", "a/b?c"),
            "/api/v1/config-values/eu%20west/a%2Fb%3Fc"
        );
        assert_eq!(
            config_value_path("stage-1", "v1.2~x"),
            "/api/v1/config-values/stage-1/v1.2~x"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ConfigClient::new("t", "https://cdb.example.com//");
        assert_eq!(client.base_url(), "https://cdb.example.com");
    }

    #[test]
    fn test_builder() {
        let client = ConfigClient::builder()
            .with_token("token123")
            .with_base_url("https://cdb.example.com")
            .with_status_policy(StatusPolicy::Strict)
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://cdb.example.com");
        assert_eq!(client.status_policy(), StatusPolicy::Strict);
    }

    #[test]
    fn test_builder_requires_token_and_url() {
        let missing_token = ConfigClient::builder()
            .with_base_url("https://cdb.example.com")
            .build();
        assert!(matches!(missing_token, Err(ProviderError::Configuration(_))));

        let missing_url = ConfigClient::builder().with_token("t").build();
        assert!(matches!(missing_url, Err(ProviderError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = ConfigClient::new("super-secret", "https://cdb.example.com");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_decode_empty_error_body_is_none() {
        let decoded = raw(404, "").decode::<ConfigValue>().unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_decode_empty_success_body_is_an_error() {
        let result = raw(200, "  ").decode::<ConfigValue>();
        assert!(matches!(result, Err(ProviderError::Decode(_))));
    }

    #[test]
    fn test_decode_error_body_with_json() {
        let decoded = raw(500, r#"{"key":"k"}"#).decode::<ConfigValue>().unwrap();
        assert_eq!(decoded.unwrap().key, "k");
    }

    #[test]
    fn test_decode_invalid_json() {
        let result = raw(200, "<html>").decode::<ConfigValue>();
        assert!(matches!(result, Err(ProviderError::Decode(_))));
    }
}
