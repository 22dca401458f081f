//! In-memory implementation of the platform's REST API.
//!
//! Serves the same routes and error bodies as the production backend so the
//! console can be run and tested locally. Provisioning is simulated: no cloud
//! resources are touched.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use multik8s_common::{Cluster, ClusterId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod clusters;
mod provisioner;

pub use auth::{UserDirectory, SESSION_COOKIE};

#[derive(Debug, Clone)]
pub struct DevServerConfig {
    pub host: String,
    pub port: u16,
    /// Delay between simulated lifecycle steps.
    pub provision_step: Duration,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            provision_step: Duration::from_secs(5),
        }
    }
}

impl DevServerConfig {
    /// Read `MULTIK8S_DEV_*` variables, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("MULTIK8S_DEV_HOST").unwrap_or(defaults.host),
            port: std::env::var("MULTIK8S_DEV_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            provision_step: std::env::var("MULTIK8S_DEV_PROVISION_STEP_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.provision_step),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub(crate) users: Arc<UserDirectory>,
    /// session id -> username
    pub(crate) sessions: Arc<DashMap<String, String>>,
    pub(crate) clusters: Arc<RwLock<BTreeMap<ClusterId, Cluster>>>,
    pub(crate) next_id: Arc<AtomicU64>,
    pub(crate) provision_step: Duration,
}

impl AppState {
    pub fn new(config: &DevServerConfig) -> Self {
        Self::with_users(config, UserDirectory::default())
    }

    pub fn with_users(config: &DevServerConfig, users: UserDirectory) -> Self {
        Self {
            users: Arc::new(users),
            sessions: Arc::new(DashMap::new()),
            clusters: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            provision_step: config.provision_step,
        }
    }
}

/// Error body shared by every route: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Admin access required")
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Cluster not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: &self.error })).into_response()
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Session endpoints
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .route("/api/auth/status", get(auth::status_handler))
        .route("/api/auth/me", get(auth::me_handler))

        // Cluster endpoints
        .route(
            "/api/clusters",
            get(clusters::list_clusters_handler).post(clusters::create_cluster_handler),
        )
        .route(
            "/api/clusters/:id",
            get(clusters::get_cluster_handler).delete(clusters::delete_cluster_handler),
        )
        .route("/api/clusters/:id/status", get(clusters::cluster_status_handler))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, create_app(state)).await
}
