use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use super::auth::TokenKeys;
use super::error::DemoError;
use super::seed;
use crate::api::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoUser {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Default)]
struct Tables {
    records: HashMap<ResourceKind, BTreeMap<i64, Value>>,
    users: Vec<DemoUser>,
    next_id: i64,
}

/// In-memory backing store of the demo backend, shared by all handlers
#[derive(Debug, Clone)]
pub struct DemoState {
    tables: Arc<RwLock<Tables>>,
    keys: Arc<TokenKeys>,
}

impl DemoState {
    /// No records and no users
    pub fn empty(keys: TokenKeys) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables {
                next_id: 1,
                ..Tables::default()
            })),
            keys: Arc::new(keys),
        }
    }

    /// Sample club data and the example accounts
    pub fn seeded(keys: TokenKeys) -> Self {
        let mut tables = Tables {
            users: seed::users(),
            ..Tables::default()
        };
        for kind in ResourceKind::ALL {
            let table = tables.records.entry(kind).or_default();
            for record in seed::records(kind) {
                if let Some(id) = record.get("id").and_then(Value::as_i64) {
                    table.insert(id, record);
                }
            }
        }
        tables.next_id = tables
            .records
            .values()
            .flat_map(|table| table.keys())
            .max()
            .map_or(1, |max| max + 1);

        Self {
            tables: Arc::new(RwLock::new(tables)),
            keys: Arc::new(keys),
        }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    pub async fn add_user(&self, email: &str, password: &str, name: &str) -> DemoUser {
        let mut tables = self.tables.write().await;
        let user = DemoUser {
            id: tables.users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        tables.users.push(user.clone());
        user
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Option<DemoUser> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()) && u.password == password)
            .cloned()
    }

    pub async fn list(&self, kind: ResourceKind) -> Vec<Value> {
        let tables = self.tables.read().await;
        tables
            .records
            .get(&kind)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn get(&self, kind: ResourceKind, id: i64) -> Option<Value> {
        let tables = self.tables.read().await;
        tables.records.get(&kind)?.get(&id).cloned()
    }

    pub async fn insert(&self, kind: ResourceKind, fields: Map<String, Value>) -> Value {
        let mut tables = self.tables.write().await;
        let id = tables.next_id;
        tables.next_id += 1;

        let mut record = fields;
        record.insert("id".into(), json!(id));
        record
            .entry("created_at")
            .or_insert_with(|| json!(Utc::now().to_rfc3339()));
        if kind == ResourceKind::Poll {
            record.entry("choices").or_insert_with(|| json!([]));
            record.entry("is_active").or_insert(json!(true));
        }

        let record = Value::Object(record);
        tables.records.entry(kind).or_default().insert(id, record.clone());
        record
    }

    /// Merge `fields` into an existing record; `id` cannot be changed
    pub async fn patch(&self, kind: ResourceKind, id: i64, fields: Map<String, Value>) -> Option<Value> {
        let mut tables = self.tables.write().await;
        let record = tables.records.get_mut(&kind)?.get_mut(&id)?;
        if let Value::Object(existing) = record {
            for (field, value) in fields {
                if field != "id" {
                    existing.insert(field, value);
                }
            }
            existing.insert("updated_at".into(), json!(Utc::now().to_rfc3339()));
        }
        Some(record.clone())
    }

    pub async fn remove(&self, kind: ResourceKind, id: i64) -> bool {
        let mut tables = self.tables.write().await;
        tables
            .records
            .get_mut(&kind)
            .and_then(|table| table.remove(&id))
            .is_some()
    }

    /// Record `user_id`'s vote for `choice` in poll `poll_id`
    pub async fn vote(&self, poll_id: i64, choice: &Value, user_id: i64) -> Result<Value, DemoError> {
        let mut tables = self.tables.write().await;
        let next_id = tables.next_id;
        let poll = tables
            .records
            .get_mut(&ResourceKind::Poll)
            .and_then(|table| table.get_mut(&poll_id))
            .ok_or_else(DemoError::not_found)?;

        if poll.get("is_active").and_then(Value::as_bool) == Some(false) {
            return Err(DemoError::bad_request("This poll is closed."));
        }

        let choices = poll
            .get_mut("choices")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| DemoError::bad_request("This poll has no choices."))?;

        let already_voted = choices.iter().any(|c| {
            c.get("votes")
                .and_then(Value::as_array)
                .is_some_and(|votes| votes.iter().any(|v| v.get("user") == Some(&json!(user_id))))
        });
        if already_voted {
            return Err(DemoError::bad_request("You have already voted in this poll."));
        }

        let wanted = crate::filter::value_text(choice)
            .ok_or_else(|| DemoError::bad_request("choice: This field is required."))?;
        let entry = choices
            .iter_mut()
            .find(|c| crate::api::id_of(c).as_deref() == Some(wanted.as_str()))
            .ok_or_else(|| DemoError::bad_request(format!("Invalid choice \"{}\".", wanted)))?;

        let vote = json!({ "id": next_id, "poll": poll_id, "choice": entry["id"].clone(), "user": user_id });
        if !entry.get("votes").is_some_and(Value::is_array) {
            entry["votes"] = json!([]);
        }
        if let Some(votes) = entry.get_mut("votes").and_then(Value::as_array_mut) {
            votes.push(vote.clone());
        }
        tables.next_id += 1;

        Ok(vote)
    }
}
