//! Terminal console for the multi-cloud Kubernetes platform.
//!
//! Each view is a plain state object driven by the binary: [`Shell`] decides
//! which view is active, [`LoginForm`], [`ClusterList`] and [`ClusterForm`]
//! talk to the backend through [`ConsoleApi`], and [`render`] turns their
//! state into text.

use std::sync::Arc;

use multik8s_sdk::{ConsoleClient, SdkError};

pub mod cluster_form;
pub mod cluster_list;
pub mod config;
pub mod login;
pub mod prompt;
pub mod render;
pub mod session;

pub use cluster_form::{ClusterForm, FieldError};
pub use cluster_list::{ClusterList, DeleteOutcome, ListSnapshot};
pub use config::ConsoleConfig;
pub use login::LoginForm;
pub use multik8s_common::{ConsoleApi, ConsoleError, User};
pub use prompt::{Prompt, TerminalPrompt};
pub use session::{Shell, View};

/// Build the HTTP-backed API the views run against.
pub fn connect(config: &ConsoleConfig) -> Result<Arc<dyn ConsoleApi>, SdkError> {
    let client = ConsoleClient::with_config(config.client_config())?;
    Ok(Arc::new(client))
}
