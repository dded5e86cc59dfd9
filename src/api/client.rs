use reqwest::{header, Method, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::api::resource::{id_value, is_addressable_id, ResourceKind};
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::session::TokenStore;

/// HTTP client for the club API.
///
/// Attaches the current session as a bearer credential and classifies every
/// response into a decoded JSON value or a [`ClientError`]. One attempt per
/// call: no retries, no timeout, and it never writes to the token store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: TokenStore,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(base_url: &str, store: TokenStore) -> Result<Self, url::ParseError> {
        Url::parse(base_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            log_requests: true,
        })
    }

    pub fn from_config(config: &AppConfig, store: TokenStore) -> Result<Self, url::ParseError> {
        let mut client = Self::new(&config.api.base_url, store)?;
        client.log_requests = config.api.enable_request_logging;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Perform one call and classify the result.
    ///
    /// `fallback` is the message used when a failed response carries no
    /// server-supplied detail.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        fallback: &str,
    ) -> Result<Value, ClientError> {
        self.request(method, path, body, fallback, None, true).await
    }

    /// Like [`send`](Self::send) without the bearer header (login)
    pub async fn send_public(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        fallback: &str,
    ) -> Result<Value, ClientError> {
        self.request(method, path, body, fallback, None, false).await
    }

    /// `GET /<resource>/`
    pub async fn fetch_list(&self, kind: ResourceKind) -> Result<Vec<Value>, ClientError> {
        let value = self
            .send(Method::GET, &kind.list_path(), None, &kind.list_error())
            .await?;

        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(ClientError::decode(format!(
                "expected a JSON array from {}, got {}",
                kind.list_path(),
                json_kind(&other)
            ))),
        }
    }

    /// `GET /<resource>/<id>/`; a 404 becomes [`ClientError::NotFound`]
    pub async fn fetch_item(&self, kind: ResourceKind, id: &str) -> Result<Value, ClientError> {
        check_id(kind, id)?;
        let not_found = kind.not_found();
        self.request(
            Method::GET,
            &kind.item_path(id),
            None,
            &kind.item_error(),
            Some(&not_found),
            true,
        )
        .await
    }

    /// `POST /<resource>/create/`
    pub async fn create(&self, kind: ResourceKind, body: &Value) -> Result<Value, ClientError> {
        self.send(Method::POST, &kind.create_path(), Some(body), &kind.create_error())
            .await
    }

    /// `PATCH /<resource>/<id>/update/`
    pub async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        body: &Value,
    ) -> Result<Value, ClientError> {
        check_id(kind, id)?;
        self.send(Method::PATCH, &kind.update_path(id), Some(body), &kind.update_error())
            .await
    }

    /// `DELETE /<resource>/<id>/delete/`; the response body is ignored
    pub async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ClientError> {
        check_id(kind, id)?;
        self.send(Method::DELETE, &kind.delete_path(id), None, &kind.delete_error())
            .await
            .map(|_| ())
    }

    /// `POST /polls/<id>/vote/` with `{poll, choice}`
    pub async fn vote(&self, poll_id: &str, choice: &Value) -> Result<Value, ClientError> {
        check_id(ResourceKind::Poll, poll_id)?;
        let body = json!({ "poll": id_value(poll_id), "choice": choice });
        self.send(
            Method::POST,
            &ResourceKind::Poll.vote_path(poll_id),
            Some(&body),
            "Failed to submit vote",
        )
        .await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        fallback: &str,
        not_found: Option<&str>,
        authenticated: bool,
    ) -> Result<Value, ClientError> {
        let url = self.url(path);
        if self.log_requests {
            tracing::debug!(%method, %url, "sending request");
        }

        let mut request = self.http.request(method.clone(), &url);
        if let Some(session) = self.store.get().filter(|_| authenticated) {
            request = request.header(header::AUTHORIZATION, session.bearer());
        }
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request did not complete");
            ClientError::network(e.to_string())
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        if status.is_success() {
            if self.log_requests {
                tracing::debug!(%method, %url, status = status.as_u16(), "request succeeded");
            }
            return decode_body(&bytes);
        }

        let server_message = server_detail(&bytes);
        tracing::warn!(
            %method,
            %url,
            status = status.as_u16(),
            detail = server_message.as_deref().unwrap_or(""),
            "request failed"
        );

        match (status, not_found) {
            (StatusCode::NOT_FOUND, Some(not_found)) => Err(ClientError::not_found(
                server_message.unwrap_or_else(|| not_found.to_string()),
            )),
            _ => Err(ClientError::request_failed(
                status.as_u16(),
                server_message.unwrap_or_else(|| fallback.to_string()),
            )),
        }
    }
}

/// Refuse ids no request could address, without touching the network
fn check_id(kind: ResourceKind, id: &str) -> Result<(), ClientError> {
    if is_addressable_id(id) {
        Ok(())
    } else {
        Err(ClientError::not_found(kind.not_found()))
    }
}

/// Empty success bodies (204, or deletes answering with nothing) decode to `null`
fn decode_body(bytes: &[u8]) -> Result<Value, ClientError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(ClientError::from)
}

/// Pull a human-readable message out of an error payload, if it has one
pub(crate) fn server_detail(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_onto_base_url() {
        let client = ApiClient::new("http://localhost:8000/", TokenStore::in_memory()).unwrap();
        assert_eq!(client.url("/events/"), "http://localhost:8000/events/");
        assert_eq!(client.url("token/"), "http://localhost:8000/token/");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url", TokenStore::in_memory()).is_err());
    }

    #[test]
    fn server_detail_prefers_detail_field() {
        assert_eq!(
            server_detail(br#"{"detail":"No active account","message":"other"}"#),
            Some("No active account".to_string())
        );
        assert_eq!(server_detail(br#"{"error":"boom"}"#), Some("boom".to_string()));
        assert_eq!(server_detail(br#"{"detail":""}"#), None);
        assert_eq!(server_detail(br#"{"detail":{"nested":true}}"#), None);
        assert_eq!(server_detail(b"<html>oops</html>"), None);
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(decode_body(b""), Ok(Value::Null));
        assert_eq!(decode_body(b"  \n"), Ok(Value::Null));
        assert!(matches!(decode_body(b"not json"), Err(ClientError::Decode(_))));
    }
}
