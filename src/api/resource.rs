use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::form_urlencoded;

/// Entity types served by the club API.
///
/// Every page of the dashboard is the same fetch/render/submit pattern
/// parameterized by one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Member,
    Event,
    Task,
    Minutes,
    File,
    Poll,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown resource '{0}' (expected one of: members, events, tasks, minutes, files, polls)")]
pub struct UnknownResource(pub String);

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Member,
        ResourceKind::Event,
        ResourceKind::Task,
        ResourceKind::Minutes,
        ResourceKind::File,
        ResourceKind::Poll,
    ];

    /// Path segment used by both the API and the dashboard routes
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::Member => "members",
            ResourceKind::Event => "events",
            ResourceKind::Task => "tasks",
            ResourceKind::Minutes => "minutes",
            ResourceKind::File => "files",
            ResourceKind::Poll => "polls",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Member => "member",
            ResourceKind::Event => "event",
            ResourceKind::Task => "task",
            ResourceKind::Minutes => "minutes",
            ResourceKind::File => "file",
            ResourceKind::Poll => "poll",
        }
    }

    /// Heading of the collection page
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Member => "Members",
            ResourceKind::Event => "Events",
            ResourceKind::Task => "Tasks",
            ResourceKind::Minutes => "Minutes",
            ResourceKind::File => "Files & Documents",
            ResourceKind::Poll => "Polls & Voting",
        }
    }

    pub fn list_path(&self) -> String {
        format!("/{}/", self.segment())
    }

    pub fn item_path(&self, id: &str) -> String {
        format!("/{}/{}/", self.segment(), path_segment(id))
    }

    pub fn create_path(&self) -> String {
        format!("/{}/create/", self.segment())
    }

    pub fn update_path(&self, id: &str) -> String {
        format!("/{}/{}/update/", self.segment(), path_segment(id))
    }

    pub fn vote_path(&self, id: &str) -> String {
        format!("/{}/{}/vote/", self.segment(), path_segment(id))
    }

    pub fn delete_path(&self, id: &str) -> String {
        format!("/{}/{}/delete/", self.segment(), path_segment(id))
    }

    pub fn list_error(&self) -> String {
        format!("Failed to fetch {}", self.segment())
    }

    pub fn item_error(&self) -> String {
        format!("Failed to fetch {}", self.singular())
    }

    pub fn not_found(&self) -> String {
        format!("{} not found", capitalize(self.singular()))
    }

    pub fn create_error(&self) -> String {
        format!("Failed to create {}", self.singular())
    }

    pub fn update_error(&self) -> String {
        format!("Failed to update {}", self.singular())
    }

    pub fn delete_error(&self) -> String {
        format!("Failed to delete {}", self.singular())
    }

    /// Field shown as the card/row heading
    pub fn label_field(&self) -> &'static str {
        match self {
            ResourceKind::Member | ResourceKind::File => "name",
            ResourceKind::Poll => "question",
            ResourceKind::Event | ResourceKind::Task | ResourceKind::Minutes => "title",
        }
    }

    /// Fields matched by the free-text search box of the list page
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Member => &["name", "email"],
            ResourceKind::Event => &["title", "description"],
            ResourceKind::Task => &["title", "description"],
            ResourceKind::Minutes => &["title", "content"],
            ResourceKind::File => &["name", "description"],
            ResourceKind::Poll => &["question", "description"],
        }
    }

    /// Fields the list page offers drop-down filters for
    pub fn facets(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Member => &["role", "status"],
            ResourceKind::Event => &["event_type", "status", "department"],
            ResourceKind::Task => &["priority", "assigned_to", "status", "department"],
            ResourceKind::Minutes => &["status"],
            ResourceKind::File => &["department", "file_type"],
            ResourceKind::Poll => &["is_active"],
        }
    }

    /// Editable fields of the create/edit form, in display order
    pub fn form_fields(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Member => &["name", "email", "role", "department"],
            ResourceKind::Event => &[
                "title",
                "description",
                "event_type",
                "start_time",
                "end_time",
                "location",
                "department",
                "is_mandatory",
                "status",
            ],
            ResourceKind::Task => &[
                "title",
                "description",
                "assigned_to",
                "status",
                "due_date",
                "priority",
                "department",
            ],
            ResourceKind::Minutes => &["title", "content"],
            ResourceKind::File => &["name", "description", "department", "is_public"],
            ResourceKind::Poll => &["question", "description"],
        }
    }

    /// Initial values a new form starts with instead of blank
    pub fn form_defaults(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ResourceKind::Task => &[("status", "ToDo")],
            _ => &[],
        }
    }

    /// Form fields holding datetimes, trimmed to minute precision when prefilled
    pub fn datetime_fields(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Event => &["start_time", "end_time"],
            ResourceKind::Task => &["due_date"],
            _ => &[],
        }
    }

    /// Whether create/update payloads carry the submitting user as `creator`
    pub fn records_creator(&self) -> bool {
        matches!(self, ResourceKind::Task)
    }

    /// After a create, tasks return to the board; everything else opens the new item
    pub fn opens_created_item(&self) -> bool {
        !matches!(self, ResourceKind::Task)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.segment() == wanted || kind.singular() == wanted)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

/// Identifier of a resource as it appears in a JSON payload.
///
/// Numeric ids stay numbers so payloads like `{poll, choice}` match what the
/// API serializes.
pub fn id_value(id: &str) -> Value {
    match id.trim().parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(id.to_string()),
    }
}

/// Read the `id` field of a payload back into its path form
pub fn id_of(resource: &Value) -> Option<String> {
    match resource.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// False for ids that cannot be one path segment: empty, or `.`/`..` which
/// URL normalization would resolve to a different resource
pub fn is_addressable_id(id: &str) -> bool {
    !matches!(id, "" | "." | "..")
}

/// Percent-encode an id so it stays one path segment (`1/../2` → `1%2F..%2F2`)
fn path_segment(id: &str) -> String {
    form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_follow_the_rest_contract() {
        assert_eq!(ResourceKind::Event.list_path(), "/events/");
        assert_eq!(ResourceKind::Task.item_path("42"), "/tasks/42/");
        assert_eq!(ResourceKind::Poll.create_path(), "/polls/create/");
        assert_eq!(ResourceKind::Task.update_path("3"), "/tasks/3/update/");
        assert_eq!(ResourceKind::Event.delete_path("7"), "/events/7/delete/");
        assert_eq!(ResourceKind::Poll.vote_path("1"), "/polls/1/vote/");
    }

    #[test]
    fn ids_stay_a_single_segment() {
        assert_eq!(ResourceKind::Task.item_path("1/../2"), "/tasks/1%2F..%2F2/");
        assert_eq!(ResourceKind::Event.delete_path("a b?c#d"), "/events/a%20b%3Fc%23d/delete/");
        assert_eq!(ResourceKind::Member.update_path("x+y"), "/members/x%2By/update/");

        let url = url::Url::parse(&format!("http://localhost{}", ResourceKind::Task.item_path("1/../2"))).unwrap();
        assert_eq!(url.path(), "/tasks/1%2F..%2F2/");

        assert!(is_addressable_id("42"));
        assert!(!is_addressable_id(".."));
        assert!(!is_addressable_id("."));
        assert!(!is_addressable_id(""));
    }

    #[test]
    fn fallback_messages() {
        assert_eq!(ResourceKind::File.list_error(), "Failed to fetch files");
        assert_eq!(ResourceKind::Task.item_error(), "Failed to fetch task");
        assert_eq!(ResourceKind::Task.not_found(), "Task not found");
        assert_eq!(ResourceKind::Minutes.not_found(), "Minutes not found");
        assert_eq!(ResourceKind::Event.create_error(), "Failed to create event");
        assert_eq!(ResourceKind::Task.update_error(), "Failed to update task");
    }

    #[test]
    fn parses_plural_and_singular_names() {
        assert_eq!("events".parse::<ResourceKind>(), Ok(ResourceKind::Event));
        assert_eq!("Task".parse::<ResourceKind>(), Ok(ResourceKind::Task));
        assert_eq!("minutes".parse::<ResourceKind>(), Ok(ResourceKind::Minutes));
        assert!("widgets".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn ids_round_trip_through_payloads() {
        assert_eq!(id_value("7"), json!(7));
        assert_eq!(id_value("a1b2"), json!("a1b2"));
        assert_eq!(id_of(&json!({ "id": 12 })), Some("12".to_string()));
        assert_eq!(id_of(&json!({ "id": "x" })), Some("x".to_string()));
        assert_eq!(id_of(&json!({ "id": null })), None);
        assert_eq!(id_of(&json!({})), None);
    }
}
