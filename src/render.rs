// Text rendering of view states for the terminal
use std::fmt::Write as _;

use serde_json::Value;

use crate::api::ResourceKind;
use crate::filter::{value_text, FileCategory, TaskBoard, TaskStatus};
use crate::mutation::MutationFlow;
use crate::polls::PollTally;
use crate::view::ViewState;

/// One table column: header, source field, width
pub type Column = (&'static str, &'static str, usize);

/// Pseudo-field rendered from the file name instead of read from the payload
const CATEGORY: &str = "@category";

pub fn columns(kind: ResourceKind) -> &'static [Column] {
    match kind {
        ResourceKind::Member => &[
            ("ID", "id", 6),
            ("NAME", "name", 22),
            ("EMAIL", "email", 28),
            ("ROLE", "role", 13),
            ("STATUS", "status", 10),
        ],
        ResourceKind::Event => &[
            ("ID", "id", 6),
            ("TITLE", "title", 28),
            ("TYPE", "event_type", 13),
            ("START", "start_time", 18),
            ("LOCATION", "location", 18),
            ("STATUS", "status", 10),
        ],
        ResourceKind::Task => &[
            ("ID", "id", 6),
            ("TITLE", "title", 28),
            ("STATUS", "status", 13),
            ("PRIORITY", "priority", 10),
            ("DUE", "due_date", 18),
            ("ASSIGNEE", "assigned_to", 15),
        ],
        ResourceKind::Minutes => &[
            ("ID", "id", 6),
            ("TITLE", "title", 32),
            ("DATE", "date", 12),
            ("AUTHOR", "author", 18),
            ("STATUS", "status", 10),
        ],
        ResourceKind::File => &[
            ("ID", "id", 6),
            ("NAME", "name", 28),
            ("TYPE", "file_type", 8),
            ("CATEGORY", CATEGORY, 10),
            ("DEPARTMENT", "department", 15),
        ],
        ResourceKind::Poll => &[
            ("ID", "id", 6),
            ("QUESTION", "question", 40),
            ("ACTIVE", "is_active", 8),
            ("CREATED", "created_at", 20),
        ],
    }
}

/// Placeholder for non-ready states, or the rendered body
pub fn state<T>(state: &ViewState<T>, body: impl FnOnce(&T) -> String) -> String {
    match state {
        ViewState::Ready(data) => body(data),
        other => other.placeholder().unwrap_or_default(),
    }
}

/// Collection page as an aligned table
pub fn table(kind: ResourceKind, items: &[Value]) -> String {
    if items.is_empty() {
        return format!("No {} found.", kind.segment());
    }

    let columns = columns(kind);
    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .map(|(title, _, width)| pad(title, *width))
        .collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());

    for item in items {
        let row: Vec<String> = columns
            .iter()
            .map(|(_, field, width)| pad(&cell(item, field), *width))
            .collect();
        let _ = writeln!(out, "{}", row.join(" ").trim_end());
    }
    let _ = write!(out, "\n{} {}", items.len(), kind.segment());
    out
}

/// Events page: upcoming and past sections, any other status after them
pub fn event_sections(events: &[Value]) -> String {
    if events.is_empty() {
        return table(ResourceKind::Event, events);
    }

    let mut upcoming = Vec::new();
    let mut past = Vec::new();
    let mut other = Vec::new();
    for event in events {
        let status = event
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_ascii_lowercase);
        match status.as_deref() {
            Some("upcoming") => upcoming.push(event.clone()),
            Some("completed") => past.push(event.clone()),
            _ => other.push(event.clone()),
        }
    }

    let mut out = String::new();
    for (title, section) in [("Upcoming Events", &upcoming), ("Past Events", &past), ("Other", &other)] {
        if section.is_empty() && title == "Other" {
            continue;
        }
        let _ = writeln!(out, "{} ({})", title, section.len());
        let _ = writeln!(out, "{}\n", table(ResourceKind::Event, section));
    }
    out.trim_end().to_string()
}

/// Detail page: heading, then every scalar field as `label: value`
pub fn item(kind: ResourceKind, item: &Value) -> String {
    let mut out = String::new();
    let heading = item
        .get(kind.label_field())
        .and_then(value_text)
        .unwrap_or_else(|| kind.singular().to_string());
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "{}", "=".repeat(heading.chars().count()));

    if let Value::Object(fields) = item {
        for (field, value) in fields {
            if field == kind.label_field() {
                continue;
            }
            if let Some(text) = value_text(value) {
                let _ = writeln!(out, "{:<15} {}", format!("{}:", label(field)), text);
            }
        }
    }

    if kind == ResourceKind::File {
        let _ = writeln!(out, "{:<15} {}", "Category:", FileCategory::of(item));
    }
    if kind == ResourceKind::Poll && item.get("choices").is_some() {
        let _ = write!(out, "\n{}", poll(&PollTally::from_poll(item)));
    }
    out.trim_end().to_string()
}

/// Poll results: one line per choice with count and share
pub fn poll(tally: &PollTally) -> String {
    let mut out = String::from("Results\n");
    if tally.choices.is_empty() {
        out.push_str("  No choices.");
        return out;
    }

    let width = tally
        .choices
        .iter()
        .map(|choice| choice.text.chars().count())
        .max()
        .unwrap_or(0)
        .max(10);
    for choice in &tally.choices {
        let _ = writeln!(
            out,
            "  [{}] {:<width$} {:>4} {}  {:>3}%",
            choice.id.as_deref().unwrap_or("-"),
            choice.text,
            choice.votes,
            if choice.votes == 1 { "vote " } else { "votes" },
            choice.percent,
            width = width
        );
    }
    let _ = write!(out, "Total votes: {}", tally.total);
    out
}

/// Task board, one section per column
pub fn board(board: &TaskBoard) -> String {
    let mut out = String::new();
    for status in TaskStatus::COLUMNS {
        let tasks = board.column(status);
        let _ = writeln!(out, "{} ({})", status.title(), tasks.len());
        for task in tasks {
            let _ = writeln!(out, "  {}", task_card(task));
        }
        out.push('\n');
    }
    if !board.unsorted.is_empty() {
        let _ = writeln!(out, "Other ({})", board.unsorted.len());
        for task in &board.unsorted {
            let _ = writeln!(out, "  {}", task_card(task));
        }
    }
    out.trim_end().to_string()
}

/// Form fields as typed, with the inline error after a failed submit
pub fn form(flow: &MutationFlow) -> String {
    let mut out = String::new();
    for (field, value) in flow.form().iter() {
        let _ = writeln!(
            out,
            "{:<15} {}",
            format!("{}:", label(field)),
            value_text(value).unwrap_or_default()
        );
    }
    if let Some(message) = flow.error_message() {
        let _ = writeln!(out, "Error: {}", message);
    }
    out.trim_end().to_string()
}

fn task_card(task: &Value) -> String {
    let mut card = format!(
        "#{} {}",
        cell(task, "id"),
        task.get("title").and_then(value_text).unwrap_or_default()
    );
    if let Some(priority) = task.get("priority").and_then(value_text) {
        let _ = write!(card, " [{}]", priority);
    }
    if let Some(due) = task.get("due_date").and_then(Value::as_str) {
        let _ = write!(card, " due {}", due.chars().take(10).collect::<String>());
    }
    card
}

fn cell(item: &Value, field: &str) -> String {
    if field == CATEGORY {
        return FileCategory::of(item).to_string();
    }
    item.get(field).and_then(value_text).unwrap_or_default()
}

/// Left-align into `width` columns, truncating with an ellipsis
fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
