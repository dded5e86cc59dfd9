use crate::routes::{Route, RouteError};
use crate::session::TokenStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow(Route),
    /// Send the user to login; the target carries the requested path
    Redirect(Route),
}

/// Navigation-time gate for the protected part of the dashboard.
///
/// Only checks that a session exists. Whether the token is still accepted is
/// found out by the next request that uses it.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: TokenStore,
}

impl RouteGuard {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }

    pub fn check(&self, route: Route) -> GuardDecision {
        if route.is_public() || self.store.is_authenticated() {
            return GuardDecision::Allow(route);
        }

        let from = route.path();
        tracing::info!(%from, "no session, redirecting to login");
        GuardDecision::Redirect(Route::Login { from: Some(from) })
    }

    pub fn navigate(&self, path: &str) -> Result<GuardDecision, RouteError> {
        Ok(self.check(Route::parse(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ResourceKind;
    use crate::session::Session;

    #[test]
    fn redirects_without_session_and_keeps_destination() {
        let guard = RouteGuard::new(TokenStore::in_memory());

        let decision = guard.navigate("/tasks/42").unwrap();
        assert_eq!(
            decision,
            GuardDecision::Redirect(Route::Login {
                from: Some("/tasks/42".to_string())
            })
        );
    }

    #[test]
    fn login_is_always_reachable() {
        let guard = RouteGuard::new(TokenStore::in_memory());
        assert_eq!(guard.check(Route::login()), GuardDecision::Allow(Route::login()));
    }

    #[test]
    fn any_session_is_enough() {
        let store = TokenStore::in_memory();
        let guard = RouteGuard::new(store.clone());
        store.set(Session::new("not-even-a-jwt", "R")).unwrap();

        assert_eq!(
            guard.check(Route::Collection(ResourceKind::Event)),
            GuardDecision::Allow(Route::Collection(ResourceKind::Event))
        );
    }

    #[test]
    fn re_evaluated_on_every_navigation() {
        let store = TokenStore::in_memory();
        let guard = RouteGuard::new(store.clone());
        store.set(Session::new("A", "R")).unwrap();
        assert!(matches!(guard.navigate("/").unwrap(), GuardDecision::Allow(_)));

        store.clear().unwrap();
        assert!(matches!(guard.navigate("/").unwrap(), GuardDecision::Redirect(_)));
    }
}
