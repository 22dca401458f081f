//! # multik8s Rust SDK
//!
//! HTTP client for the multi-cloud Kubernetes platform API. The backend owns
//! every cluster and every status transition; this crate only moves JSON over
//! a cookie-authenticated session.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use multik8s_sdk::{ConsoleClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ConsoleClient::new("http://localhost:5000")?;
//!
//!     let user = client.login(&Credentials {
//!         username: "admin".to_string(),
//!         password: "admin123".to_string(),
//!     }).await?;
//!     println!("Signed in as {} ({})", user.username, user.role);
//!
//!     for cluster in client.list_clusters().await? {
//!         println!("{} [{}] {}", cluster.name, cluster.cloud_provider, cluster.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions
//!
//! The login endpoint answers with a session cookie. Every `ConsoleClient`
//! keeps its own cookie store, so a client that logged in stays logged in for
//! all later calls and a fresh client starts anonymous.
//!
//! ## Errors
//!
//! | Variant | Cause |
//! |---------|-------|
//! | `SdkError::Api` | non-success status, with the body's `error` field if present |
//! | `SdkError::Http` | connection failure or undecodable success body |
//! | `SdkError::InvalidUrl` | the base URL did not parse |
//!
//! `SdkError` converts into [`ConsoleError`], the error type of the
//! [`ConsoleApi`] trait the console views are written against.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub use multik8s_common::{
    AuthStatus, CloudProvider, Cluster, ClusterDraft, ClusterId, ClusterStatus,
    ClusterStatusSummary, ConsoleApi, ConsoleError, Credentials, Role, User,
};

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("<no message>"))]
    Api { status: u16, message: Option<String> },
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl From<SdkError> for ConsoleError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::Api { status, message } => ConsoleError::Server { status, message },
            SdkError::Http(e) if e.is_decode() => ConsoleError::Decode(e.to_string()),
            SdkError::Http(e) => ConsoleError::Transport(e.to_string()),
            SdkError::Serialization(e) => ConsoleError::Decode(e.to_string()),
            SdkError::InvalidUrl(url) => ConsoleError::Transport(format!("invalid base URL {url}")),
        }
    }
}

/// Connection settings for [`ConsoleClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:5000`. Paths such as
    /// `/api/clusters` are appended to it.
    pub base_url: String,
    /// Whole-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// The login endpoint wraps the user (`{"message": ..., "user": {...}}`), but
/// a bare user object is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoginReply {
    Wrapped { user: User },
    Bare(User),
}

impl From<LoginReply> for User {
    fn from(reply: LoginReply) -> Self {
        match reply {
            LoginReply::Wrapped { user } | LoginReply::Bare(user) => user,
        }
    }
}

/// Client for the platform's REST API.
///
/// Cheap to share behind an `Arc`; the underlying `reqwest::Client` pools
/// connections and holds the session cookie.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use multik8s_sdk::{ConsoleApi, ConsoleClient};
///
/// # fn example() -> Result<(), multik8s_sdk::SdkError> {
/// let api: Arc<dyn ConsoleApi> = Arc::new(ConsoleClient::new("http://localhost:5000")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    client: Client,
    base_url: String,
}

impl ConsoleClient {
    /// Create a client with transport defaults.
    ///
    /// # Errors
    ///
    /// Returns `SdkError::InvalidUrl` when `base_url` is not an absolute URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SdkError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, SdkError> {
        Url::parse(&config.base_url).map_err(|_| SdkError::InvalidUrl(config.base_url.clone()))?;

        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into `SdkError::Api`, keeping the body's
    /// `error` field when it has one.
    async fn check(response: Response) -> Result<Response, SdkError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error);
        debug!("API returned {} ({:?})", status, message);

        Err(SdkError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SdkError> {
        Ok(Self::check(response).await?.json().await?)
    }

    /// Ask whether the current session is authenticated.
    ///
    /// `GET /api/auth/status` always answers 200; an anonymous session yields
    /// `authenticated: false` and no user.
    pub async fn auth_status(&self) -> Result<AuthStatus, SdkError> {
        let response = self.client.get(self.url("/api/auth/status")).send().await?;
        Self::decode(response).await
    }

    /// Sign in. On success the session cookie is stored in this client.
    ///
    /// # Errors
    ///
    /// Bad credentials come back as `SdkError::Api` with the server's message,
    /// e.g. `"Invalid credentials"`.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, SdkError> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(credentials)
            .send()
            .await?;

        let reply: LoginReply = Self::decode(response).await?;
        Ok(reply.into())
    }

    /// End the session. The response body is ignored.
    pub async fn logout(&self) -> Result<(), SdkError> {
        let response = self.client.post(self.url("/api/auth/logout")).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `GET /api/auth/me`: the signed-in user, or a 401 `SdkError::Api`.
    pub async fn current_user(&self) -> Result<User, SdkError> {
        let response = self.client.get(self.url("/api/auth/me")).send().await?;
        Self::decode(response).await
    }

    /// List every cluster the backend tracks.
    pub async fn list_clusters(&self) -> Result<Vec<Cluster>, SdkError> {
        let response = self.client.get(self.url("/api/clusters")).send().await?;
        Self::decode(response).await
    }

    pub async fn get_cluster(&self, id: ClusterId) -> Result<Cluster, SdkError> {
        let response = self
            .client
            .get(self.url(&format!("/api/clusters/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Lightweight status probe for a single cluster.
    pub async fn cluster_status(&self, id: ClusterId) -> Result<ClusterStatusSummary, SdkError> {
        let response = self
            .client
            .get(self.url(&format!("/api/clusters/{id}/status")))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Submit a creation request. The draft is posted as-is; validation is the
    /// backend's job.
    ///
    /// # Returns
    ///
    /// The created record, normally in `pending` status.
    pub async fn create_cluster(&self, draft: &ClusterDraft) -> Result<Cluster, SdkError> {
        let response = self
            .client
            .post(self.url("/api/clusters"))
            .json(draft)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Ask the backend to tear a cluster down. Requires the admin role.
    pub async fn delete_cluster(&self, id: ClusterId) -> Result<(), SdkError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/clusters/{id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ConsoleApi for ConsoleClient {
    async fn auth_status(&self) -> multik8s_common::Result<AuthStatus> {
        Ok(ConsoleClient::auth_status(self).await?)
    }

    async fn login(&self, credentials: &Credentials) -> multik8s_common::Result<User> {
        Ok(ConsoleClient::login(self, credentials).await?)
    }

    async fn logout(&self) -> multik8s_common::Result<()> {
        Ok(ConsoleClient::logout(self).await?)
    }

    async fn list_clusters(&self) -> multik8s_common::Result<Vec<Cluster>> {
        Ok(ConsoleClient::list_clusters(self).await?)
    }

    async fn get_cluster(&self, id: ClusterId) -> multik8s_common::Result<Cluster> {
        Ok(ConsoleClient::get_cluster(self, id).await?)
    }

    async fn create_cluster(&self, draft: &ClusterDraft) -> multik8s_common::Result<Cluster> {
        Ok(ConsoleClient::create_cluster(self, draft).await?)
    }

    async fn delete_cluster(&self, id: ClusterId) -> multik8s_common::Result<()> {
        Ok(ConsoleClient::delete_cluster(self, id).await?)
    }
}
