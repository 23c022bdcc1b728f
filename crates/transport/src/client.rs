//! `reqwest`-backed [`StoreClient`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use extensions::{HttpMethod, RequestSpec, StoreClient, TransportError, PUBLISHABLE_KEY_HEADER};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::query::flatten_query;
use crate::{BuildError, TransportConfig};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP base client for the storefront API.
///
/// Holds one pooled [`reqwest::Client`]; clone it freely.
#[derive(Debug, Clone)]
pub struct HttpStoreClient {
    http: Client,
    base_url: Url,
    publishable_key: Option<String>,
}

impl HttpStoreClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidBaseUrl`] if the base URL does not parse
    /// or cannot carry a path, and [`BuildError::Http`] if the underlying
    /// HTTP client cannot be initialised.
    pub fn new(config: &TransportConfig) -> Result<Self, BuildError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(10);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(BuildError::Http)?;
        Self::with_http_client(http, config)
    }

    /// Builds a client around an existing [`reqwest::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidBaseUrl`] if the base URL is unusable.
    pub fn with_http_client(http: Client, config: &TransportConfig) -> Result<Self, BuildError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(&config.base_url)?,
            publishable_key: config.publishable_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// The normalised base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.http
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl {
                url: path.to_owned(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl StoreClient for HttpStoreClient {
    #[instrument(
        name = "store_request",
        skip_all,
        fields(method = %spec.method, path = %path, request_id = tracing::field::Empty)
    )]
    async fn fetch(&self, path: &str, spec: RequestSpec) -> Result<Value, TransportError> {
        let url = self.resolve(path)?;
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let mut request = self.http.request(to_reqwest_method(spec.method), url);
        // reqwest appends repeated headers, so a default is only added when
        // the call site did not supply its own value.
        let defaults = [
            ("accept", Some("application/json")),
            (REQUEST_ID_HEADER, Some(request_id.as_str())),
            (PUBLISHABLE_KEY_HEADER, self.publishable_key.as_deref()),
        ];
        for (name, value) in defaults {
            if let Some(value) = value.filter(|_| !spec.headers.contains(name)) {
                request = request.header(name, value);
            }
        }
        for (name, value) in spec.headers.iter() {
            request = request.header(name, value);
        }
        if let Some(query) = &spec.query {
            request = request.query(&flatten_query(query));
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| TransportError::Network {
            message: e.to_string(),
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| TransportError::Network {
            message: e.to_string(),
        })?;

        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = bytes.len(),
            "storefront response"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
            message: e.to_string(),
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Parses `raw` and guarantees a trailing `/` so relative joins append to,
/// rather than replace, any path prefix.
fn normalize_base_url(raw: &str) -> Result<Url, BuildError> {
    let mut url = Url::parse(raw).map_err(|e| BuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(BuildError::InvalidBaseUrl {
            url: raw.to_owned(),
            message: "URL cannot be used as a base".to_owned(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = normalize_base_url("https://example.com/commerce").unwrap();
        assert_eq!(url.as_str(), "https://example.com/commerce/");
        assert_eq!(
            url.join("store/wishlists").unwrap().as_str(),
            "https://example.com/commerce/store/wishlists"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(BuildError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            normalize_base_url("mailto:ops@example.com"),
            Err(BuildError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_resolve_strips_leading_slash() {
        let client = HttpStoreClient::new(&TransportConfig::new("http://localhost:9000")).unwrap();
        assert_eq!(
            client.resolve("/store/reviews").unwrap().as_str(),
            "http://localhost:9000/store/reviews"
        );
    }
}
