use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::DemoError;
use super::state::{DemoState, DemoUser};
use crate::config::DemoConfig;

pub const ACCESS: &str = "access";
pub const REFRESH: &str = "refresh";

/// Payload of the tokens the demo backend issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoClaims {
    pub user_id: i64,
    pub email: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// HS256 signing material
#[derive(Debug, Clone)]
pub struct TokenKeys {
    secret: String,
    expiry_hours: u64,
}

impl TokenKeys {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }

    pub fn from_config(config: &DemoConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.token_expiry_hours)
    }

    pub fn issue(&self, user: &DemoUser) -> Result<TokenPair, DemoError> {
        let access_hours = self.expiry_hours as i64;
        Ok(TokenPair {
            access: self.sign(user, ACCESS, Duration::hours(access_hours))?,
            refresh: self.sign(user, REFRESH, Duration::hours(access_hours * 7))?,
        })
    }

    /// Validate signature and expiry; only access tokens authorize requests
    pub fn verify(&self, token: &str) -> Result<DemoClaims, DemoError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let claims = decode::<DemoClaims>(token, &key, &Validation::default())
            .map_err(|e| DemoError::unauthorized(format!("Given token not valid: {}", e)))?
            .claims;

        if claims.token_type != ACCESS {
            return Err(DemoError::unauthorized("Given token not valid for any token type"));
        }
        Ok(claims)
    }

    fn sign(&self, user: &DemoUser, token_type: &str, ttl: Duration) -> Result<String, DemoError> {
        if self.secret.is_empty() {
            return Err(DemoError::Token("signing secret not configured".to_string()));
        }

        let now = Utc::now();
        let claims = DemoClaims {
            user_id: user.id,
            email: user.email.clone(),
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        Ok(encode(&Header::default(), &claims, &key)?)
    }
}

/// Reject requests without a valid bearer access token; otherwise expose the
/// claims to handlers as a request extension
pub async fn require_bearer(
    State(state): State<DemoState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, DemoError> {
    let token = bearer_token(&headers)?;
    let claims = state.keys().verify(token)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, DemoError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| DemoError::unauthorized("Authentication credentials were not provided."))?
        .to_str()
        .map_err(|_| DemoError::unauthorized("Invalid Authorization header"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(DemoError::unauthorized(
            "Authorization header must use Bearer token format",
        )),
    }
}
