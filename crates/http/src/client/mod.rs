//! SplitAlgo HTTP client

pub mod auth;
pub mod endpoints;
pub mod error;
pub mod expenses;
pub mod groups;
pub mod settlements;

pub use endpoints::Endpoint;
pub use error::ClientError;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use splitalgo_core::Session;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default API base, matching a locally running backend
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

const USER_AGENT: &str = concat!("splitalgo-client/", env!("CARGO_PKG_VERSION"));

/// Options for a single call: method, JSON body and extra headers
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::get()
        }
    }

    /// POST without a body
    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::get()
        }
    }

    /// POST with `body` encoded as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be represented as JSON
    pub fn post_json<B: Serialize>(body: &B) -> Result<Self, ClientError> {
        let body = serde_json::to_value(body).map_err(ClientError::Serialization)?;
        Ok(Self {
            body: Some(body),
            ..Self::post()
        })
    }

    /// Add a header; later values for the same name replace earlier ones
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// SplitAlgo API client
///
/// The session is consulted on every call, so logging in or out through any
/// clone of the same `Session` takes effect on the next request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a usable HTTP base
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).session(session).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Session whose token this client sends
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Issue a request and decode the JSON response
    ///
    /// Headers are merged in this order: `Content-Type: application/json`,
    /// the caller's headers, then `Authorization: Bearer <token>` when a token
    /// is stored.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses and undecodable bodies all
    /// come back as [`ClientError`]
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let url = endpoint.url(&self.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.extend(options.headers);

        let token = self.session.token();
        if let Some(token) = &token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidToken)?;
            headers.insert(header::AUTHORIZATION, value);
        }

        debug!(
            method = %options.method,
            %endpoint,
            authenticated = token.is_some(),
            "Sending API request"
        );

        let mut request = self.client.request(options.method, url).headers(headers);
        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(ClientError::Serialization)?;
            request = request.body(bytes);
        }

        let response = request.send().await.inspect_err(|err| {
            warn!(%endpoint, error = %err, "API request failed before a response arrived");
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error = ClientError::from_response(status, &body);
            warn!(%endpoint, status = status.as_u16(), error = %error, "API request rejected");
            return Err(error);
        }

        debug!(%endpoint, status = status.as_u16(), "API request succeeded");
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }
}

/// Builder for `ApiClient`
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    session: Option<Session>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session whose token is attached to requests
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Set a request timeout; none is applied by default
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    ///
    /// Without an explicit session the client gets a fresh in-memory one.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing, unparseable or not HTTP(S)
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let raw = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let base_url = parse_base_url(&raw)?;

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()));
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            base_url,
            session: self.session.unwrap_or_else(Session::in_memory),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ClientError::Configuration(format!("invalid base_url '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ClientError::Configuration(format!(
            "base_url must be an http(s) URL, got '{raw}'"
        )));
    }

    Ok(url)
}
