// Sample club data served by the demo backend
use serde_json::{json, Value};

use super::state::DemoUser;
use crate::api::ResourceKind;

pub const DEMO_EMAIL: &str = "member@example.com";
pub const DEMO_PASSWORD: &str = "password123";

pub fn users() -> Vec<DemoUser> {
    vec![
        DemoUser {
            id: 1,
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            name: "Alex Johnson".to_string(),
        },
        DemoUser {
            id: 2,
            email: "coordinator@example.com".to_string(),
            password: DEMO_PASSWORD.to_string(),
            name: "Sarah Williams".to_string(),
        },
    ]
}

pub fn records(kind: ResourceKind) -> Vec<Value> {
    match kind {
        ResourceKind::Member => members(),
        ResourceKind::Event => events(),
        ResourceKind::Task => tasks(),
        ResourceKind::Minutes => minutes(),
        ResourceKind::File => files(),
        ResourceKind::Poll => polls(),
    }
}

fn members() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Alex Johnson", "email": "alex.johnson@email.com", "phone": "+1 (555) 123-4567", "role": "Admin", "department": "hr", "status": "active", "join_date": "2023-01-15" }),
        json!({ "id": 2, "name": "Sarah Williams", "email": "sarah.w@email.com", "phone": "+1 (555) 234-5678", "role": "Coordinator", "department": "marketing", "status": "active", "join_date": "2023-02-20" }),
        json!({ "id": 3, "name": "Mike Chen", "email": "mike.chen@email.com", "phone": "+1 (555) 345-6789", "role": "Member", "department": "technical_team", "status": "active", "join_date": "2023-03-10" }),
        json!({ "id": 4, "name": "Emily Davis", "email": "emily.davis@email.com", "phone": "+1 (555) 456-7890", "role": "Member", "department": "finance", "status": "inactive", "join_date": "2023-01-25" }),
    ]
}

fn events() -> Vec<Value> {
    vec![
        json!({ "id": 1, "title": "Weekly Team Meeting", "description": "Regular weekly team sync to discuss progress and upcoming tasks.", "event_type": "meeting", "start_time": "2024-01-15T14:00:00Z", "end_time": "2024-01-15T15:00:00Z", "location": "Conference Room A", "department": "hr", "is_mandatory": true, "status": "upcoming" }),
        json!({ "id": 2, "title": "Club Social Event", "description": "Monthly social gathering for all club members to network and relax.", "event_type": "party", "start_time": "2024-01-20T18:00:00Z", "end_time": "2024-01-20T21:00:00Z", "location": "Community Center", "department": "er", "is_mandatory": false, "status": "upcoming" }),
        json!({ "id": 3, "title": "Workshop: Leadership Skills", "description": "Interactive workshop focused on developing leadership and communication skills.", "event_type": "workshop", "start_time": "2024-01-25T10:00:00Z", "end_time": "2024-01-25T14:00:00Z", "location": "Training Room B", "department": "hr", "is_mandatory": false, "status": "upcoming" }),
        json!({ "id": 4, "title": "Board Meeting", "description": "Monthly board meeting to review club finances and strategic planning.", "event_type": "meeting", "start_time": "2024-01-10T16:00:00Z", "end_time": "2024-01-10T18:00:00Z", "location": "Board Room", "department": "finance", "is_mandatory": true, "status": "completed" }),
    ]
}

fn tasks() -> Vec<Value> {
    vec![
        json!({ "id": 1, "title": "Plan Annual Club Event", "description": "Coordinate logistics for the annual club celebration including venue, catering, and entertainment.", "status": "todo", "priority": "high", "assigned_to": "Alex Johnson", "due_date": "2024-01-25T17:00:00Z", "department": "er", "creator": 1 }),
        json!({ "id": 2, "title": "Update Club Website", "description": "Refresh the club website with new content, photos, and upcoming events information.", "status": "in-progress", "priority": "medium", "assigned_to": "Sarah Williams", "due_date": "2024-01-20T17:00:00Z", "department": "technical_team", "creator": 1 }),
        json!({ "id": 3, "title": "Review Budget Proposal", "description": "Analyze and approve the proposed budget for Q1 activities and events.", "status": "done", "priority": "high", "assigned_to": "Mike Chen", "due_date": "2024-01-15T17:00:00Z", "department": "finance", "creator": 2 }),
        json!({ "id": 4, "title": "Organize Team Building", "description": "Plan and coordinate team building activities for club members.", "status": "todo", "priority": "low", "assigned_to": "Emily Davis", "due_date": "2024-02-01T17:00:00Z", "department": "hr", "creator": 2 }),
        json!({ "id": 5, "title": "Prepare Meeting Minutes", "description": "Document and distribute minutes from the last board meeting.", "status": "in-progress", "priority": "medium", "assigned_to": "Alex Johnson", "due_date": "2024-01-18T17:00:00Z", "department": "hr", "creator": 1 }),
        json!({ "id": 6, "title": "Recruit New Members", "description": "Develop and implement strategies to attract new club members.", "status": "ToDo", "priority": "high", "assigned_to": "Sarah Williams", "due_date": "2024-01-30T17:00:00Z", "department": "marketing", "creator": 2 }),
    ]
}

fn minutes() -> Vec<Value> {
    vec![
        json!({ "id": 1, "title": "Weekly Team Meeting - January 15, 2024", "date": "2024-01-15", "author": "Alex Johnson", "content": "Discussed upcoming events and task assignments. Key decisions made regarding budget allocation.", "status": "published" }),
        json!({ "id": 2, "title": "Board Meeting - January 10, 2024", "date": "2024-01-10", "author": "Sarah Williams", "content": "Reviewed quarterly performance and approved new initiatives. Budget discussions and strategic planning.", "status": "draft" }),
        json!({ "id": 3, "title": "Event Planning Session - January 8, 2024", "date": "2024-01-08", "author": "Emily Davis", "content": "Planned the annual club celebration. Venue selection and entertainment options discussed.", "status": "published" }),
    ]
}

fn files() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Budget 2024.pdf", "description": "Approved budget for the year", "department": "finance", "file_type": "pdf", "is_public": false, "uploaded_at": "2024-01-05T09:30:00Z" }),
        json!({ "id": 2, "name": "Club logo.png", "description": "Logo in high resolution", "department": "visual_creation", "file_type": "png", "is_public": true, "uploaded_at": "2024-01-07T12:00:00Z" }),
        json!({ "id": 3, "name": "Workshop slides.zip", "description": "Slides from the leadership workshop", "department": "hr", "file_type": "zip", "is_public": true, "uploaded_at": "2024-01-26T08:15:00Z" }),
        json!({ "id": 4, "name": "Sponsors.xlsx", "description": "Sponsor contact list", "department": "marketing", "file_type": "xlsx", "is_public": false, "uploaded_at": "2024-01-12T16:45:00Z" }),
    ]
}

fn polls() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "question": "Where should the spring retreat be held?",
            "description": "Pick a destination for the annual retreat.",
            "is_active": true,
            "created_at": "2024-01-10T09:00:00Z",
            "choices": [
                { "id": 1, "text": "Mountain lodge", "votes": votes(1, 100, 10) },
                { "id": 2, "text": "Beach house", "votes": votes(2, 110, 5) },
                { "id": 3, "text": "City hotel", "votes": votes(3, 115, 2) }
            ]
        }),
        json!({
            "id": 2,
            "question": "Move the weekly meeting to Thursdays?",
            "description": "",
            "is_active": false,
            "created_at": "2023-12-01T09:00:00Z",
            "choices": [
                { "id": 4, "text": "Yes", "votes": votes(4, 100, 3) },
                { "id": 5, "text": "No", "votes": votes(5, 103, 3) }
            ]
        }),
    ]
}

/// `count` votes for `choice` from consecutive users starting at `first_user`
fn votes(choice: i64, first_user: i64, count: i64) -> Value {
    (0..count)
        .map(|i| json!({ "id": choice * 1000 + i, "choice": choice, "user": first_user + i }))
        .collect()
}
