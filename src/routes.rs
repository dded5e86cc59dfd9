use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::api::ResourceKind;

pub const LOGIN_PATH: &str = "/login";

/// Sidebar entries: label and route path
pub const NAV_ITEMS: [(&str, &str); 7] = [
    ("Dashboard", "/"),
    ("Members", "/members"),
    ("Events", "/events"),
    ("Tasks", "/tasks"),
    ("Minutes", "/minutes"),
    ("Files", "/files"),
    ("Polls", "/polls"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("No route matches '{0}'")]
    NoMatch(String),

    #[error(transparent)]
    UnknownResource(#[from] crate::api::UnknownResource),
}

/// A location in the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Public entry point; `from` is where an unauthenticated visit was headed
    Login { from: Option<String> },
    Dashboard,
    Collection(ResourceKind),
    Create(ResourceKind),
    Detail(ResourceKind, String),
    Edit(ResourceKind, String),
}

impl Route {
    pub fn login() -> Self {
        Route::Login { from: None }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path
            .split(&['?', '#'][..])
            .next()
            .unwrap_or_default()
            .trim();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::login(),
            [kind] => Route::Collection(kind.parse()?),
            [kind, "create"] => Route::Create(kind.parse()?),
            [kind, id] => Route::Detail(kind.parse()?, id.to_string()),
            [kind, id, "edit"] => Route::Edit(kind.parse()?, id.to_string()),
            _ => return Err(RouteError::NoMatch(path.to_string())),
        };
        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login { .. } => LOGIN_PATH.to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Collection(kind) => format!("/{}", kind.segment()),
            Route::Create(kind) => format!("/{}/create", kind.segment()),
            Route::Detail(kind, id) => format!("/{}/{}", kind.segment(), id),
            Route::Edit(kind, id) => format!("/{}/{}/edit", kind.segment(), id),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login { .. })
    }

    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Route::Collection(kind)
            | Route::Create(kind)
            | Route::Detail(kind, _)
            | Route::Edit(kind, _) => Some(*kind),
            Route::Login { .. } | Route::Dashboard => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}
