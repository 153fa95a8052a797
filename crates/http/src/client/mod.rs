//! Brewdesk API client

pub mod account;
pub mod analytics;
pub mod error;
pub mod expiry;
pub mod menus;
pub mod profile;
pub mod promos;
pub mod qr;
pub mod refresh;
pub mod request;
pub mod reviews;
pub mod shops;

pub use error::{ClientError, RefreshError};
pub use expiry::{FnExpiryHandler, LogExpiryHandler, SessionExpiryHandler};
pub use request::PendingRequest;

use crate::config::ClientConfig;
use crate::types::{RefreshRequest, RefreshResponse};
use brewdesk_core::{MemorySessionStore, SessionStore};
use futures::FutureExt;
use refresh::{RefreshFlight, RefreshOutcome};
use reqwest::{Client, ClientBuilder, Method, Response};
use std::sync::Arc;
use std::time::Duration;

/// Brewdesk API client.
///
/// Cloning is cheap and clones share the session store, the expiry handler
/// and the in-flight refresh.
#[derive(Clone)]
pub struct BrewClient {
    client: Client,
    base_url: String,
    login_route: String,
    refresh_path: String,
    store: Arc<dyn SessionStore>,
    on_expired: Arc<dyn SessionExpiryHandler>,
    refresh: Arc<RefreshFlight>,
}

impl BrewClient {
    /// Create a client with an in-memory session and default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> BrewClientBuilder {
        BrewClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Route handed to the expiry handler on teardown
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// Session store this client reads and writes
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Start describing a request to `path`
    pub fn request(&self, method: Method, path: &str) -> PendingRequest {
        PendingRequest::new(method, path)
    }

    /// Start describing a request to a path built from `segments`, each one
    /// percent-encoded so ids cannot change the route
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an empty, `.` or `..` segment
    pub fn resource(&self, method: Method, segments: &[&str]) -> Result<PendingRequest, ClientError> {
        Ok(PendingRequest::new(method, encode_path(segments)?))
    }

    /// Send a request through the session pipeline.
    ///
    /// The stored access token is attached as a bearer token. A 401 on a
    /// request that has not been retried yet triggers one refresh and one
    /// replay; everything else is returned to the caller untouched.
    pub async fn send(&self, mut pending: PendingRequest) -> Result<Response, ClientError> {
        if pending.is_authenticated() {
            self.authorize(&mut pending)?;
        }

        match self.dispatch(&pending).await {
            Err(err)
                if err.is_auth_expired() && pending.is_authenticated() && !pending.is_retried() =>
            {
                self.recover(pending, err).await
            }
            other => other,
        }
    }

    /// Send a request and decode a JSON response
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        pending: PendingRequest,
    ) -> Result<T, ClientError> {
        let response = self.send(pending).await?;
        Ok(response.json().await?)
    }

    /// Send a request whose response body is not needed
    pub async fn execute_empty(&self, pending: PendingRequest) -> Result<(), ClientError> {
        self.send(pending).await.map(drop)
    }

    /// Tear the session down and notify the host.
    ///
    /// Clears tokens and the active shop (the remembered username only
    /// survives with remember-me), then calls the expiry handler. Safe to
    /// call when already signed out. Callers return straight after this.
    pub fn end_session(&self) {
        if let Err(err) = self.store.clear_session() {
            warn!(error = %err, "Failed to clear stored session");
        }
        info!(login_route = %self.login_route, "Session ended");
        self.on_expired.session_expired(&self.login_route);
    }

    fn authorize(&self, pending: &mut PendingRequest) -> Result<(), ClientError> {
        if let Some(token) = self.store.access_token()? {
            pending.set_bearer(&token)?;
        } else {
            trace!(path = pending.path(), "No access token stored, sending unauthenticated");
        }
        Ok(())
    }

    async fn recover(
        &self,
        mut pending: PendingRequest,
        original: ClientError,
    ) -> Result<Response, ClientError> {
        pending.mark_retried();

        // Another request already refreshed after this one was sent
        if let Some(stored) = self.store.access_token()?
            && pending.bearer_token() != Some(stored.as_str())
        {
            debug!(path = pending.path(), "Replaying request with the newer stored token");
            pending.set_bearer(&stored)?;
            return self.dispatch(&pending).await;
        }

        let Some(refresh_token) = self.store.refresh_token()? else {
            debug!(path = pending.path(), "Access token rejected and no refresh token stored");
            self.end_session();
            return Err(original);
        };

        let this = self.clone();
        let outcome = self
            .refresh
            .run(move || async move { this.refresh_access_token(refresh_token).await }.boxed())
            .await;

        match outcome {
            Ok(access_token) => {
                debug!(path = pending.path(), "Replaying request with refreshed token");
                pending.set_bearer(&access_token)?;
                self.dispatch(&pending).await
            }
            Err(reason) => {
                debug!(path = pending.path(), %reason, "Token refresh failed");
                Err(original)
            }
        }
    }

    /// Exchange the refresh token for a new access token and persist it.
    /// Any failure ends the session before the outcome is shared.
    async fn refresh_access_token(&self, refresh_token: String) -> RefreshOutcome {
        debug!("Refreshing access token");
        let outcome = self.call_refresh_endpoint(&refresh_token).await.and_then(|token| {
            self.store
                .set_access_token(&token)
                .map(|()| token)
                .map_err(|err| RefreshError::Storage(err.to_string()))
        });

        if let Err(reason) = &outcome {
            warn!(%reason, "Token refresh failed, ending session");
            self.end_session();
        }
        outcome
    }

    async fn call_refresh_endpoint(&self, refresh_token: &str) -> RefreshOutcome {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response = self
            .client
            .post(self.url(&self.refresh_path))
            .json(&body)
            .send()
            .await
            .map_err(|err| RefreshError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|err| RefreshError::Transport(err.to_string()))?;

        refreshed
            .access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or(RefreshError::MissingAccessToken)
    }

    async fn dispatch(&self, pending: &PendingRequest) -> Result<Response, ClientError> {
        let mut request = self
            .client
            .request(pending.method().clone(), self.url(pending.path()))
            .headers(pending.headers().clone());

        if !pending.query_pairs().is_empty() {
            request = request.query(pending.query_pairs());
        }
        if let Some(body) = pending.body() {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn encode_path(segments: &[&str]) -> Result<String, ClientError> {
    if let Some(bad) = segments
        .iter()
        .find(|segment| matches!(segment.trim(), "" | "." | ".."))
    {
        return Err(ClientError::BadRequest(format!("invalid path segment {bad:?}")));
    }

    let mut url = url::Url::parse("http://localhost/")
        .map_err(|err| ClientError::Configuration(err.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ClientError::Configuration("cannot build request path".into()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.path().to_string())
}

/// Builder for [`BrewClient`]
#[derive(Default)]
pub struct BrewClientBuilder {
    base_url: Option<String>,
    login_route: Option<String>,
    refresh_path: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn SessionStore>>,
    on_expired: Option<Arc<dyn SessionExpiryHandler>>,
}

impl BrewClientBuilder {
    /// Start from a loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        let builder = Self::default()
            .base_url(config.base_url.clone())
            .login_route(config.login_route.clone())
            .refresh_path(config.refresh_path.clone())
            .user_agent(config.user_agent.clone());

        if config.timeout_secs == 0 {
            builder
        } else {
            builder.timeout(Duration::from_secs(config.timeout_secs))
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the route reported to the expiry handler
    pub fn login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = Some(route.into());
        self
    }

    /// Set the token-refresh endpoint path
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the session store
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the handler called when a session ends
    pub fn on_session_expired(mut self, handler: Arc<dyn SessionExpiryHandler>) -> Self {
        self.on_expired = Some(handler);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<BrewClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|err| ClientError::Configuration(format!("invalid base_url {base_url}: {err}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let defaults = ClientConfig::default();
        let refresh_path = self.refresh_path.unwrap_or(defaults.refresh_path);
        if !refresh_path.starts_with('/') {
            return Err(ClientError::Configuration(format!(
                "refresh_path must start with '/': {refresh_path}"
            )));
        }

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.unwrap_or(defaults.user_agent));
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder.build()?;

        Ok(BrewClient {
            client,
            base_url,
            login_route: self.login_route.unwrap_or(defaults.login_route),
            refresh_path,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            on_expired: self
                .on_expired
                .unwrap_or_else(|| Arc::new(LogExpiryHandler)),
            refresh: Arc::new(RefreshFlight::new()),
        })
    }
}
