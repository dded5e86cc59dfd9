pub mod claims;
pub mod store;

use serde::{Deserialize, Serialize};

pub use store::{StoreError, TokenStore};

/// Credentials identifying a logged-in user to the club API.
///
/// The refresh token is kept so it can be inspected, but nothing renews the
/// access token with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: String,
    pub refresh: String,
}

impl Session {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }
}
