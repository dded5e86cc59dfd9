use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::{id_of, ApiClient, ResourceKind};
use crate::error::ClientError;
use crate::routes::Route;
use crate::session::claims;

/// Field → value mapping backing a create/edit form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected FIELD=VALUE, got '{0}'")]
pub struct InvalidAssignment(pub String);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty form for `kind`: every editable field present, blank unless the
    /// kind gives it a starting value (new tasks start in `ToDo`)
    pub fn blank(kind: ResourceKind) -> Self {
        let mut form = Self::new();
        for field in kind.form_fields() {
            let value = if is_flag(field) {
                Value::Bool(false)
            } else {
                Value::String(String::new())
            };
            form.0.insert((*field).to_string(), value);
        }
        for (field, value) in kind.form_defaults() {
            form.set(*field, *value);
        }
        form
    }

    /// Prefill an edit form from the resource as the API returned it.
    ///
    /// Missing or null fields become blank and datetimes are cut to
    /// `YYYY-MM-DDTHH:MM`.
    pub fn from_resource(kind: ResourceKind, resource: &Value) -> Self {
        let mut form = Self::blank(kind);
        for field in kind.form_fields() {
            let value = match resource.get(*field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if kind.datetime_fields().contains(field) => {
                    Value::String(s.chars().take(16).collect())
                }
                Some(value) => value.clone(),
            };
            form.0.insert((*field).to_string(), value);
        }
        form
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Apply a `field=value` assignment from the command line.
    ///
    /// `true`/`false` become booleans (checkbox fields); everything else stays
    /// a string the way form inputs submit it.
    pub fn assign(&mut self, assignment: &str) -> Result<(), InvalidAssignment> {
        let (field, raw) = assignment
            .split_once('=')
            .filter(|(field, _)| !field.trim().is_empty())
            .ok_or_else(|| InvalidAssignment(assignment.to_string()))?;

        let value = match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        };
        self.0.insert(field.trim().to_string(), value);
        Ok(())
    }

    pub fn merge(&mut self, other: FormData) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

fn is_flag(field: &str) -> bool {
    field.starts_with("is_")
}

/// The write a form submits
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(ResourceKind),
    Update(ResourceKind, String),
    Delete(ResourceKind, String),
    Vote { poll: String, choice: Value },
}

impl Mutation {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Mutation::Create(kind) | Mutation::Update(kind, _) | Mutation::Delete(kind, _) => *kind,
            Mutation::Vote { .. } => ResourceKind::Poll,
        }
    }

    /// Where the flow navigates once the write succeeded
    pub fn destination(&self, response: &Value) -> Route {
        match self {
            Mutation::Create(kind) if kind.opens_created_item() => match id_of(response) {
                Some(id) => Route::Detail(*kind, id),
                None => Route::Collection(*kind),
            },
            Mutation::Create(kind) => Route::Collection(*kind),
            Mutation::Update(kind, id) => Route::Detail(*kind, id.clone()),
            Mutation::Delete(kind, _) => Route::Collection(*kind),
            Mutation::Vote { poll, .. } => Route::Detail(ResourceKind::Poll, poll.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitState {
    Editing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("{0}")]
    Failed(ClientError),
}

/// An issued write, owned until its result is handed back to the flow
#[derive(Debug, Clone)]
pub struct PendingMutation {
    mutation: Mutation,
    body: Option<Value>,
}

impl PendingMutation {
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub async fn execute(&self, client: &ApiClient) -> Result<Value, ClientError> {
        let body = self.body.as_ref().unwrap_or(&Value::Null);
        match &self.mutation {
            Mutation::Create(kind) => client.create(*kind, body).await,
            Mutation::Update(kind, id) => client.update(*kind, id, body).await,
            Mutation::Delete(kind, id) => client.delete(*kind, id).await.map(|_| Value::Null),
            Mutation::Vote { poll, choice } => client.vote(poll, choice).await,
        }
    }
}

/// Submit-then-navigate state for one form.
///
/// A successful write always ends in navigation; a failed one leaves the form
/// as typed with the error shown under the submit control.
#[derive(Debug, Clone)]
pub struct MutationFlow {
    mutation: Mutation,
    form: FormData,
    state: SubmitState,
    error: Option<ClientError>,
}

impl MutationFlow {
    pub fn new(mutation: Mutation, form: FormData) -> Self {
        Self {
            mutation,
            form,
            state: SubmitState::Editing,
            error: None,
        }
    }

    pub fn create(kind: ResourceKind, form: FormData) -> Self {
        Self::new(Mutation::Create(kind), form)
    }

    pub fn update(kind: ResourceKind, id: impl Into<String>, form: FormData) -> Self {
        Self::new(Mutation::Update(kind, id.into()), form)
    }

    pub fn delete(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::new(Mutation::Delete(kind, id.into()), FormData::new())
    }

    pub fn vote(poll: impl Into<String>, choice: Value) -> Self {
        Self::new(
            Mutation::Vote {
                poll: poll.into(),
                choice,
            },
            FormData::new(),
        )
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormData {
        &mut self.form
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// False while a submission is in flight (the trigger is disabled)
    pub fn can_submit(&self) -> bool {
        self.state == SubmitState::Editing
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(ClientError::display_message)
    }

    /// Enter `Submitting` and build the single request to issue.
    ///
    /// `access_token` fills the `creator` field for resources that record one.
    pub fn begin(&mut self, access_token: Option<&str>) -> Result<PendingMutation, SubmitError> {
        if !self.can_submit() {
            return Err(SubmitError::AlreadySubmitting);
        }
        self.state = SubmitState::Submitting;
        self.error = None;

        let body = match &self.mutation {
            Mutation::Create(kind) | Mutation::Update(kind, _) => {
                let mut body = self.form.clone();
                if kind.records_creator() {
                    let creator = access_token.and_then(claims::user_id).unwrap_or(Value::Null);
                    body.set("creator", creator);
                }
                Some(body.to_value())
            }
            Mutation::Delete(..) | Mutation::Vote { .. } => None,
        };

        Ok(PendingMutation {
            mutation: self.mutation.clone(),
            body,
        })
    }

    /// Settle the pending write: a route to navigate to, or the error to show
    pub fn finish(&mut self, result: Result<Value, ClientError>) -> Result<Route, ClientError> {
        self.state = SubmitState::Editing;
        match result {
            Ok(response) => {
                let destination = self.mutation.destination(&response);
                tracing::info!(mutation = ?self.mutation, to = %destination, "mutation succeeded");
                Ok(destination)
            }
            Err(err) => {
                tracing::warn!(mutation = ?self.mutation, error = %err, "mutation failed");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Issue exactly one write and resolve it
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Route, SubmitError> {
        let session = client.store().get();
        let pending = self.begin(session.as_ref().map(|s| s.access.as_str()))?;
        let result = pending.execute(client).await;
        self.finish(result).map_err(SubmitError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assignments_parse_flags_and_strings() {
        let mut form = FormData::new();
        form.assign("title=Board meeting").unwrap();
        form.assign("is_mandatory=true").unwrap();
        form.assign("note=a=b").unwrap();

        assert_eq!(form.get("title"), Some(&json!("Board meeting")));
        assert_eq!(form.get("is_mandatory"), Some(&json!(true)));
        assert_eq!(form.get("note"), Some(&json!("a=b")));
        assert!(form.assign("no-equals").is_err());
        assert!(form.assign("=value").is_err());
    }

    #[test]
    fn edit_form_prefill_trims_datetimes() {
        let task = json!({
            "id": 3,
            "title": "Review budget",
            "description": null,
            "due_date": "2024-01-15T09:30:00Z",
            "priority": "high",
            "unrelated": "ignored"
        });
        let form = FormData::from_resource(ResourceKind::Task, &task);

        assert_eq!(form.get("title"), Some(&json!("Review budget")));
        assert_eq!(form.get("description"), Some(&json!("")));
        assert_eq!(form.get("due_date"), Some(&json!("2024-01-15T09:30")));
        assert_eq!(form.get("unrelated"), None);
        assert_eq!(form.get("assigned_to"), Some(&json!("")));
    }

    #[test]
    fn blank_task_form_lands_in_todo_column() {
        let mut form = FormData::blank(ResourceKind::Task);
        form.set("title", "Book venue");
        assert_eq!(form.get("status"), Some(&json!("ToDo")));

        let board = crate::filter::TaskBoard::group(&[form.to_value()]);
        assert_eq!(board.todo.len(), 1);
        assert!(board.unsorted.is_empty());
    }

    #[test]
    fn blank_event_form_has_unchecked_checkbox() {
        let form = FormData::blank(ResourceKind::Event);
        assert_eq!(form.get("is_mandatory"), Some(&json!(false)));
        assert_eq!(form.get("status"), Some(&json!("")));
    }

    #[test]
    fn destinations() {
        let created = json!({ "id": 11 });
        assert_eq!(
            Mutation::Create(ResourceKind::Event).destination(&created),
            Route::Detail(ResourceKind::Event, "11".into())
        );
        assert_eq!(
            Mutation::Create(ResourceKind::Task).destination(&created),
            Route::Collection(ResourceKind::Task)
        );
        assert_eq!(
            Mutation::Update(ResourceKind::Task, "4".into()).destination(&Value::Null),
            Route::Detail(ResourceKind::Task, "4".into())
        );
        assert_eq!(
            Mutation::Delete(ResourceKind::Event, "7".into()).destination(&Value::Null),
            Route::Collection(ResourceKind::Event)
        );
        assert_eq!(
            Mutation::Vote { poll: "2".into(), choice: json!(5) }.destination(&Value::Null),
            Route::Detail(ResourceKind::Poll, "2".into())
        );
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut flow = MutationFlow::delete(ResourceKind::Event, "7");
        let pending = flow.begin(None).unwrap();
        assert!(pending.body().is_none());
        assert!(!flow.can_submit());
        assert_eq!(flow.begin(None).unwrap_err(), SubmitError::AlreadySubmitting);

        let route = flow.finish(Ok(Value::Null)).unwrap();
        assert_eq!(route, Route::Collection(ResourceKind::Event));
        assert!(flow.can_submit());
    }

    #[test]
    fn failure_keeps_form_and_shows_error() {
        let mut form = FormData::blank(ResourceKind::Event);
        form.set("title", "Social night");
        let mut flow = MutationFlow::create(ResourceKind::Event, form.clone());

        flow.begin(None).unwrap();
        let err = flow
            .finish(Err(ClientError::request_failed(400, "Failed to create event")))
            .unwrap_err();

        assert_eq!(err.display_message(), "Failed to create event");
        assert_eq!(flow.error_message(), Some("Failed to create event"));
        assert_eq!(flow.form(), &form);
        assert_eq!(flow.state(), SubmitState::Editing);

        // retrying clears the previous error
        flow.begin(None).unwrap();
        assert_eq!(flow.error_message(), None);
    }

    #[test]
    fn task_payload_carries_creator_from_token() {
        use base64::Engine as _;
        let payload =
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(br#"{"user_id":5}"#);
        let token = format!("header.{payload}.sig");

        let mut form = FormData::blank(ResourceKind::Task);
        form.set("title", "Plan event");
        let mut flow = MutationFlow::create(ResourceKind::Task, form);
        let pending = flow.begin(Some(&token)).unwrap();

        let body = pending.body().unwrap();
        assert_eq!(body["creator"], json!(5));
        assert_eq!(body["title"], json!("Plan event"));
    }

    #[test]
    fn unreadable_token_sends_null_creator() {
        let mut flow = MutationFlow::update(ResourceKind::Task, "1", FormData::new());
        let pending = flow.begin(Some("opaque")).unwrap();
        assert_eq!(pending.body().unwrap()["creator"], Value::Null);

        let mut flow = MutationFlow::create(ResourceKind::Event, FormData::new());
        let pending = flow.begin(Some("opaque")).unwrap();
        assert!(pending.body().unwrap().get("creator").is_none());
    }
}
