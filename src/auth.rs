use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::routes::Route;
use crate::session::{Session, StoreError, TokenStore};

pub const LOGIN_PATH: &str = "/token/";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{}", .0.display_message())]
    Request(#[from] ClientError),

    #[error("Login failed. Please check your credentials.")]
    MissingTokens,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LoginError {
    /// Text shown above the login form
    pub fn display_message(&self) -> String {
        self.to_string()
    }
}

/// Exchange credentials for a session, store it, and return where to go next.
///
/// The destination is always the dashboard; a `from` path captured by the
/// route guard is not consumed.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<Route, LoginError> {
    let body = serde_json::to_value(credentials).map_err(ClientError::from)?;
    let response = client
        .send_public(Method::POST, LOGIN_PATH, Some(&body), LOGIN_FAILED)
        .await?;

    let session = session_from(&response).ok_or(LoginError::MissingTokens)?;
    client.store().set(session)?;
    tracing::info!(email = %credentials.email, "logged in");

    Ok(Route::Dashboard)
}

/// Forget the session and return to the login page
pub fn logout(store: &TokenStore) -> Result<Route, StoreError> {
    store.clear()?;
    tracing::info!("logged out");
    Ok(Route::login())
}

fn session_from(response: &Value) -> Option<Session> {
    let access = response.get("access")?.as_str().filter(|s| !s.is_empty())?;
    let refresh = response.get("refresh")?.as_str().filter(|s| !s.is_empty())?;
    Some(Session::new(access, refresh))
}
