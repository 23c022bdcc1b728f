//! Ports and shared options consumed by every plugin.
//!
//! - [`StoreClient`] is the single capability a base client must provide.
//! - [`AuthHeaderProvider`] produces per-call authentication headers.
//! - [`ClientOptions`] bundles the provider with [`StoreConfig`].
//! - [`ClientContext`] is what a plugin's endpoint factory receives; its
//!   [`ClientContext::send`] implements the uniform per-endpoint contract.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use crate::{ClientError, Headers, RequestSpec, TransportError};

/// Header carrying the storefront publishable API key.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

// ---------------------------------------------------------------------------
// Base client port
// ---------------------------------------------------------------------------

/// The capability every base client must provide: issue one request against
/// the storefront API and return the parsed JSON body.
///
/// Implementations own URL resolution, connection pooling, and status
/// handling. A non-success status must be reported as
/// [`TransportError::Status`]. An empty body is reported as [`Value::Null`].
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Issues `spec` against `path` (relative to the store base URL, e.g.
    /// `"/store/wishlists"`).
    async fn fetch(&self, path: &str, spec: RequestSpec) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: StoreClient + ?Sized> StoreClient for Arc<T> {
    async fn fetch(&self, path: &str, spec: RequestSpec) -> Result<Value, TransportError> {
        (**self).fetch(path, spec).await
    }
}

// ---------------------------------------------------------------------------
// Auth headers
// ---------------------------------------------------------------------------

/// Produces authentication headers immediately before each endpoint call.
///
/// Implement this directly for asynchronous sources (token refresh, secure
/// storage). Synchronous sources can use [`Headers`] itself, [`BearerToken`],
/// or [`AuthFn`].
#[async_trait]
pub trait AuthHeaderProvider: Send + Sync {
    /// Returns the headers to merge under the caller's own headers.
    async fn auth_headers(&self) -> Result<Headers, ClientError>;
}

#[async_trait]
impl AuthHeaderProvider for Headers {
    async fn auth_headers(&self) -> Result<Headers, ClientError> {
        Ok(self.clone())
    }
}

/// A fixed `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AuthHeaderProvider for BearerToken {
    async fn auth_headers(&self) -> Result<Headers, ClientError> {
        Ok(Headers::new().with("authorization", format!("Bearer {}", self.0)))
    }
}

/// Adapts a synchronous closure into an [`AuthHeaderProvider`].
pub struct AuthFn<F>(pub F);

#[async_trait]
impl<F> AuthHeaderProvider for AuthFn<F>
where
    F: Fn() -> Result<Headers, ClientError> + Send + Sync,
{
    async fn auth_headers(&self) -> Result<Headers, ClientError> {
        (self.0)()
    }
}

/// Adapts an async closure into an [`AuthHeaderProvider`].
pub struct AsyncAuthFn<F>(pub F);

#[async_trait]
impl<F, Fut> AuthHeaderProvider for AsyncAuthFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Headers, ClientError>> + Send + 'static,
{
    async fn auth_headers(&self) -> Result<Headers, ClientError> {
        (self.0)().await
    }
}

// ---------------------------------------------------------------------------
// Shared options
// ---------------------------------------------------------------------------

/// Out-of-band store connection settings.
///
/// Only endpoints that bypass the base client read these; everything else
/// relies on the base client's own configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    base_url: Option<String>,
    publishable_key: Option<String>,
}

impl StoreConfig {
    /// Creates a config with neither setting present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store base URL (e.g. `"https://api.example.com"`).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into()).filter(|s: &String| !s.is_empty());
        self
    }

    /// Sets the publishable API key.
    #[must_use]
    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = Some(key.into()).filter(|s: &String| !s.is_empty());
        self
    }

    /// The store base URL, if configured.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The publishable API key, if configured.
    pub fn publishable_key(&self) -> Option<&str> {
        self.publishable_key.as_deref()
    }
}

/// Cross-cutting options handed to every plugin's endpoint factory.
#[derive(Clone, Default)]
pub struct ClientOptions {
    auth: Option<Arc<dyn AuthHeaderProvider>>,
    store: StoreConfig,
}

impl ClientOptions {
    /// Options with no auth provider and an empty [`StoreConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the auth-header provider consulted before every call.
    #[must_use]
    pub fn with_auth(mut self, provider: impl AuthHeaderProvider + 'static) -> Self {
        self.auth = Some(Arc::new(provider));
        self
    }

    /// Installs an already shared auth-header provider.
    #[must_use]
    pub fn with_shared_auth(mut self, provider: Arc<dyn AuthHeaderProvider>) -> Self {
        self.auth = Some(provider);
        self
    }

    /// Sets the out-of-band store settings.
    #[must_use]
    pub fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// The auth-header provider, if any.
    pub fn auth(&self) -> Option<&Arc<dyn AuthHeaderProvider>> {
        self.auth.as_ref()
    }

    /// The out-of-band store settings.
    pub fn store_config(&self) -> &StoreConfig {
        &self.store
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("auth", &self.auth.as_ref().map(|_| "<provider>"))
            .field("store", &self.store)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Context handed to endpoint factories
// ---------------------------------------------------------------------------

/// The base client plus shared options, as seen by a plugin.
///
/// Cheap to clone; every endpoint namespace keeps its own copy.
#[derive(Clone)]
pub struct ClientContext {
    client: Arc<dyn StoreClient>,
    options: Arc<ClientOptions>,
}

impl ClientContext {
    /// Creates a context from a base client and options.
    pub fn new(client: Arc<dyn StoreClient>, options: ClientOptions) -> Self {
        Self {
            client,
            options: Arc::new(options),
        }
    }

    /// The base client.
    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    /// The shared options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Resolves auth headers and overlays `caller` on top of them.
    pub async fn resolve_headers(&self, caller: Option<Headers>) -> Result<Headers, ClientError> {
        let auth = match self.options.auth() {
            Some(provider) => provider.auth_headers().await?,
            None => Headers::new(),
        };
        Ok(match caller {
            Some(caller) => auth.merged_with(&caller),
            None => auth,
        })
    }

    /// Performs one endpoint call.
    ///
    /// Resolves auth headers, merges `caller` headers over them, issues
    /// exactly one request through the base client, and decodes the JSON
    /// body into `T`. Transport failures are returned unchanged.
    #[instrument(
        name = "endpoint",
        skip_all,
        fields(method = %spec.method, path = %path)
    )]
    pub async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        spec: RequestSpec,
        caller: Option<Headers>,
    ) -> Result<T, ClientError> {
        let headers = self.resolve_headers(caller).await?;
        let spec = spec.with_headers(headers);

        let body = self.client.fetch(path, spec).await.inspect_err(|err| {
            tracing::debug!(error = %err, "storefront request failed");
        })?;

        serde_json::from_value(body).map_err(|e| ClientError::Decode {
            path: path.to_owned(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
