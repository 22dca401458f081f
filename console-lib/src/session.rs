use std::sync::Arc;

use multik8s_common::{ConsoleApi, User};
use tracing::{debug, info, warn};

/// Which screen the shell currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Session check still in flight.
    Loading,
    Login,
    ClusterList,
    ClusterForm,
}

/// Top-level session holder.
///
/// Owns the signed-in user and whether the creation form is open; the
/// visible [`View`] is derived from those two facts.
pub struct Shell {
    api: Arc<dyn ConsoleApi>,
    user: Option<User>,
    checking: bool,
    show_create_form: bool,
}

impl Shell {
    pub fn new(api: Arc<dyn ConsoleApi>) -> Self {
        Self {
            api,
            user: None,
            checking: true,
            show_create_form: false,
        }
    }

    /// Ask the backend whether the cookie jar already holds a session.
    ///
    /// Any failure is treated as "not signed in".
    pub async fn check_session(&mut self) {
        self.checking = true;
        self.user = match self.api.auth_status().await {
            Ok(status) => status.into_user(),
            Err(err) => {
                warn!("Session check failed: {}", err);
                None
            }
        };
        self.checking = false;

        match &self.user {
            Some(user) => info!("Resuming session for {} ({})", user.username, user.role),
            None => debug!("No active session"),
        }
    }

    pub fn view(&self) -> View {
        match (&self.user, self.checking) {
            (_, true) => View::Loading,
            (None, false) => View::Login,
            (Some(_), false) if self.show_create_form => View::ClusterForm,
            (Some(_), false) => View::ClusterList,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn api(&self) -> Arc<dyn ConsoleApi> {
        Arc::clone(&self.api)
    }

    pub fn on_login(&mut self, user: User) {
        info!("Signed in as {} ({})", user.username, user.role);
        self.user = Some(user);
        self.checking = false;
        self.show_create_form = false;
    }

    /// Drop the local session. The backend call is the list view's job.
    pub fn on_logout(&mut self) {
        self.user = None;
        self.show_create_form = false;
    }

    pub fn open_create_form(&mut self) {
        if self.user.is_some() {
            self.show_create_form = true;
        }
    }

    /// Return to the list, whether the form was submitted or cancelled.
    pub fn close_create_form(&mut self) {
        self.show_create_form = false;
    }
}
