use serde::Serialize;

use crate::error::ClientError;

pub const LOADING_TEXT: &str = "Loading…";

/// Lifecycle of one fetch-bound view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(ClientError),
}

/// Tag of a [`ViewState`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Idle => Phase::Idle,
            ViewState::Loading => Phase::Loading,
            ViewState::Ready(_) => Phase::Ready,
            ViewState::Failed(_) => Phase::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Ready or Failed: nothing further happens until a remount or key change
    pub fn is_settled(&self) -> bool {
        matches!(self, ViewState::Ready(_) | ViewState::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            ViewState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Text shown instead of the view body while it has no data
    pub fn placeholder(&self) -> Option<String> {
        match self {
            ViewState::Loading => Some(LOADING_TEXT.to_string()),
            ViewState::Failed(err) => Some(format!("Error: {}", err.display_message())),
            ViewState::Idle | ViewState::Ready(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Idle => ViewState::Idle,
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(data) => ViewState::Ready(f(data)),
            ViewState::Failed(err) => ViewState::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders() {
        assert_eq!(ViewState::<()>::Idle.placeholder(), None);
        assert_eq!(ViewState::<()>::Loading.placeholder().as_deref(), Some("Loading…"));
        assert_eq!(ViewState::Ready(1).placeholder(), None);

        let failed: ViewState<()> = ViewState::Failed(ClientError::not_found("Task not found"));
        assert_eq!(failed.placeholder().as_deref(), Some("Error: Task not found"));
    }

    #[test]
    fn ready_and_failed_are_exclusive() {
        let ready = ViewState::Ready("x");
        assert!(ready.data().is_some() && ready.error().is_none());

        let failed: ViewState<&str> = ViewState::Failed(ClientError::network("down"));
        assert!(failed.data().is_none() && failed.error().is_some());
        assert!(ready.is_settled() && failed.is_settled());
    }
}
