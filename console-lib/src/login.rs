use multik8s_common::{ConsoleApi, Credentials, User};
use tracing::{debug, warn};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password required";

/// Username/password form.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Start a submission. Returns the credentials to send, or `None` when
    /// a request is already in flight or a field is empty.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.submitting {
            return None;
        }
        if self.username.is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_CREDENTIALS_MESSAGE.to_string());
            return None;
        }

        self.error = None;
        self.submitting = true;
        Some(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    /// Record the backend's answer. On failure the typed values stay.
    pub fn finish_submit(&mut self, result: multik8s_common::Result<User>) -> Option<User> {
        self.submitting = false;
        match result {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("Login for {} failed: {}", self.username, err);
                self.error = Some(err.user_message(LOGIN_FAILED_MESSAGE));
                None
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn ConsoleApi) -> Option<User> {
        let credentials = self.begin_submit()?;
        debug!("Logging in as {}", credentials.username);
        let result = api.login(&credentials).await;
        self.finish_submit(result)
    }
}
