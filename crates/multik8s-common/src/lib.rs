// Shared types for the multik8s console, SDK and development backend

use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
mod types;

pub use catalog::SelectOption;
pub use types::*;

/// Shown for every transport-level failure, whatever the action.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// The backend answered with a non-success status. `message` is the
    /// `error` field of the JSON body, when there was one.
    #[error("Server Error ({status}): {}", .message.as_deref().unwrap_or("no error message"))]
    Server { status: u16, message: Option<String> },

    #[error("Transport Error: {0}")]
    Transport(String),

    #[error("Decode Error: {0}")]
    Decode(String),
}

impl ConsoleError {
    /// Text to surface to the user for this failure.
    ///
    /// Server-reported messages are shown verbatim; a server error without a
    /// message falls back to `fallback`; everything else is a network error.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ConsoleError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ConsoleError::Server { message: None, .. } => fallback.to_string(),
            ConsoleError::Transport(_) | ConsoleError::Decode(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, ConsoleError::Server { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

/// The backend REST surface the console depends on.
///
/// Implemented over HTTP by `multik8s-sdk`; views only ever see this trait.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    async fn auth_status(&self) -> Result<AuthStatus>;
    async fn login(&self, credentials: &Credentials) -> Result<User>;
    async fn logout(&self) -> Result<()>;
    async fn list_clusters(&self) -> Result<Vec<Cluster>>;
    async fn get_cluster(&self, id: ClusterId) -> Result<Cluster>;
    async fn create_cluster(&self, draft: &ClusterDraft) -> Result<Cluster>;
    async fn delete_cluster(&self, id: ClusterId) -> Result<()>;
}
