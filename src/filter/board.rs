use serde::Serialize;
use serde_json::Value;

/// Column of the task board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub const COLUMNS: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Normalize the status spellings the API and forms use
    /// (`todo`, `ToDo`, `in-progress`, `InProgress`, `Done`, `Evaluated`)
    pub fn parse(status: &str) -> Option<Self> {
        let normalized: String = status
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "todo" => Some(TaskStatus::Todo),
            "inprogress" => Some(TaskStatus::InProgress),
            "done" | "evaluated" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// Tasks grouped into board columns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskBoard {
    pub todo: Vec<Value>,
    #[serde(rename = "in-progress")]
    pub in_progress: Vec<Value>,
    pub done: Vec<Value>,
    /// Tasks whose status fits no column
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsorted: Vec<Value>,
}

impl TaskBoard {
    pub fn group(tasks: &[Value]) -> Self {
        let mut board = TaskBoard::default();
        for task in tasks {
            let status = task
                .get("status")
                .and_then(Value::as_str)
                .and_then(TaskStatus::parse);
            let column = match status {
                Some(TaskStatus::Todo) => &mut board.todo,
                Some(TaskStatus::InProgress) => &mut board.in_progress,
                Some(TaskStatus::Done) => &mut board.done,
                None => &mut board.unsorted,
            };
            column.push(task.clone());
        }
        board
    }

    pub fn column(&self, status: TaskStatus) -> &[Value] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len() + self.unsorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_spellings() {
        assert_eq!(TaskStatus::parse("todo"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::parse("ToDo"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::parse("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("InProgress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("Evaluated"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::parse("blocked"), None);
    }

    #[test]
    fn groups_tasks_by_status() {
        let tasks = vec![
            json!({ "id": 1, "status": "todo" }),
            json!({ "id": 2, "status": "in-progress" }),
            json!({ "id": 3, "status": "ToDo" }),
            json!({ "id": 4, "status": "done" }),
            json!({ "id": 5 }),
        ];

        let board = TaskBoard::group(&tasks);
        assert_eq!(board.column(TaskStatus::Todo).len(), 2);
        assert_eq!(board.in_progress, vec![tasks[1].clone()]);
        assert_eq!(board.done, vec![tasks[3].clone()]);
        assert_eq!(board.unsorted, vec![tasks[4].clone()]);
        assert_eq!(board.len(), 5);

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["in-progress"][0]["id"], 2);
    }
}
