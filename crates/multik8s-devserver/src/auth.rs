use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use multik8s_common::{AuthStatus, Role, User};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{ApiError, AppState};

pub const SESSION_COOKIE: &str = "multik8s_session";

fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

struct Account {
    password_hash: String,
    role: Role,
}

/// Known accounts with SHA-256 password hashes.
pub struct UserDirectory {
    accounts: HashMap<String, Account>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        let mut users = Self::empty();
        users.insert("admin", "admin123", Role::Admin);
        users.insert("user", "user123", Role::Member);
        users
    }
}

impl UserDirectory {
    pub fn empty() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    pub fn insert(&mut self, username: &str, password: &str, role: Role) {
        self.accounts.insert(
            username.to_string(),
            Account {
                password_hash: hash_password(password),
                role,
            },
        );
    }

    pub fn verify(&self, username: &str, password: &str) -> Option<User> {
        let account = self.accounts.get(username)?;
        (account.password_hash == hash_password(password)).then(|| User {
            username: username.to_string(),
            role: account.role,
        })
    }

    pub fn lookup(&self, username: &str) -> Option<User> {
        self.accounts.get(username).map(|account| User {
            username: username.to_string(),
            role: account.role,
        })
    }
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, id)| id.to_string())
}

/// The user behind the request's session cookie, if any.
pub(crate) fn session_user(headers: &HeaderMap, state: &AppState) -> Option<User> {
    let id = session_id(headers)?;
    let username = state.sessions.get(&id)?.value().clone();
    state.users.lookup(&username)
}

pub(crate) fn require_user(headers: &HeaderMap, state: &AppState) -> Result<User, ApiError> {
    session_user(headers, state).ok_or_else(ApiError::unauthorized)
}

pub(crate) fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<User, ApiError> {
    let user = require_user(headers, state)?;
    if !user.is_admin() {
        return Err(ApiError::forbidden());
    }
    Ok(user)
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    username: Option<String>,
    password: Option<String>,
}

#[instrument(skip(state, body))]
pub async fn login_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = match serde_json::from_slice::<LoginBody>(&body) {
        Ok(LoginBody {
            username: Some(username),
            password: Some(password),
        }) => (username, password),
        _ => return Err(ApiError::bad_request("Username and password required")),
    };

    let Some(user) = state.users.verify(&username, &password) else {
        warn!("Rejected login for {}", username);
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    };

    let session = Uuid::new_v4().to_string();
    state.sessions.insert(session.clone(), user.username.clone());
    info!("User {} logged in ({})", user.username, user.role);

    let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly"))
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "message": "Login successful",
            "user": user,
        })),
    ))
}

#[instrument(skip(state, headers))]
pub async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(id) = session_id(&headers) {
        if let Some((_, username)) = state.sessions.remove(&id) {
            info!("User {} logged out", username);
        }
    }

    (
        [(
            header::SET_COOKIE,
            HeaderValue::from_static("multik8s_session=; Path=/; Max-Age=0"),
        )],
        Json(json!({ "message": "Logout successful" })),
    )
}

pub async fn status_handler(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatus> {
    let user = session_user(&headers, &state);
    Json(AuthStatus {
        authenticated: user.is_some(),
        user,
    })
}

pub async fn me_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiError> {
    require_user(&headers, &state).map(Json)
}
