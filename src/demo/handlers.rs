use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::{json, Map, Value};

use super::auth::DemoClaims;
use super::error::DemoError;
use super::state::DemoState;
use crate::api::ResourceKind;

/// POST /token/
pub async fn token(
    State(state): State<DemoState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DemoError> {
    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
    let (email, password) = (field("email"), field("password"));
    if email.is_empty() || password.is_empty() {
        return Err(DemoError::bad_request("Email and password are required."));
    }

    let user = state.authenticate(&email, &password).await.ok_or_else(|| {
        tracing::info!(%email, "demo login rejected");
        DemoError::unauthorized("No active account found with the given credentials")
    })?;

    let tokens = state.keys().issue(&user)?;
    tracing::info!(user_id = user.id, "demo login");
    Ok(Json(json!(tokens)))
}

/// GET /:kind/
pub async fn list(
    State(state): State<DemoState>,
    Path(kind): Path<String>,
) -> Result<Json<Value>, DemoError> {
    let kind = resource(&kind)?;
    Ok(Json(Value::Array(state.list(kind).await)))
}

/// GET /:kind/:id/
pub async fn detail(
    State(state): State<DemoState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Value>, DemoError> {
    let kind = resource(&kind)?;
    let record = state.get(kind, record_id(&id)?).await.ok_or_else(DemoError::not_found)?;
    Ok(Json(record))
}

/// POST /:kind/create/
pub async fn create(
    State(state): State<DemoState>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, DemoError> {
    let kind = resource(&kind)?;
    let fields = object(body)?;

    let label = kind.label_field();
    let has_label = fields
        .get(label)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    if !has_label {
        return Err(DemoError::bad_request(format!("{}: This field is required.", label)));
    }

    let record = state.insert(kind, fields).await;
    tracing::info!(%kind, id = %record["id"], "demo record created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /:kind/:id/update/
pub async fn update(
    State(state): State<DemoState>,
    Path((kind, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DemoError> {
    let kind = resource(&kind)?;
    let fields = object(body)?;
    let record = state
        .patch(kind, record_id(&id)?, fields)
        .await
        .ok_or_else(DemoError::not_found)?;
    Ok(Json(record))
}

/// DELETE /:kind/:id/delete/
pub async fn remove(
    State(state): State<DemoState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, DemoError> {
    let kind = resource(&kind)?;
    if state.remove(kind, record_id(&id)?).await {
        tracing::info!(%kind, %id, "demo record deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DemoError::not_found())
    }
}

/// POST /polls/:id/vote/
pub async fn vote(
    State(state): State<DemoState>,
    Extension(claims): Extension<DemoClaims>,
    Path((kind, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, DemoError> {
    if resource(&kind)? != ResourceKind::Poll {
        return Err(DemoError::not_found());
    }
    let choice = body.get("choice").cloned().unwrap_or(Value::Null);
    let vote = state.vote(record_id(&id)?, &choice, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

fn resource(segment: &str) -> Result<ResourceKind, DemoError> {
    // only the plural segments are routes
    ResourceKind::ALL
        .into_iter()
        .find(|kind| kind.segment() == segment)
        .ok_or_else(DemoError::not_found)
}

fn record_id(id: &str) -> Result<i64, DemoError> {
    id.parse().map_err(|_| DemoError::not_found())
}

fn object(body: Value) -> Result<Map<String, Value>, DemoError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(DemoError::bad_request("Expected a JSON object.")),
    }
}
