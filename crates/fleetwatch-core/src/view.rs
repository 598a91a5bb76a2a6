// ── View routing ──

use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;

/// Screens the dashboard can present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    Agents,
    AgentDetail { agent_id: String },
    Reports,
}

impl View {
    /// Every view except the login screen requires an authenticated session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// Two-state router: unauthenticated sessions see only [`View::Login`];
/// authenticated sessions navigate freely among the data views.
///
/// The active view is published on a `watch` channel so presentation
/// layers can react to route changes they did not initiate (for example a
/// forced logout after a rejected token).
pub struct ViewRouter {
    current: watch::Sender<View>,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self {
            current: watch::channel(View::Login).0,
        }
    }

    pub fn current(&self) -> View {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.current.subscribe()
    }

    /// Switch to `view`, refusing session-gated views while unauthenticated.
    pub fn navigate(&self, view: View, authenticated: bool) -> Result<(), CoreError> {
        if view.requires_session() && !authenticated {
            return Err(CoreError::Unauthenticated);
        }
        debug!(?view, "navigating");
        self.current.send_replace(view);
        Ok(())
    }

    /// Entry route after a successful login.
    pub fn on_login(&self) {
        self.current.send_replace(View::Agents);
    }

    /// Drop back to the login screen; on logout no other view is reachable.
    pub fn on_logout(&self) {
        self.current.send_replace(View::Login);
    }
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_login() {
        let router = ViewRouter::new();
        assert_eq!(router.current(), View::Login);
    }

    #[test]
    fn gated_views_rejected_while_unauthenticated() {
        let router = ViewRouter::new();

        let err = router.navigate(View::Agents, false).unwrap_err();
        assert!(matches!(err, CoreError::Unauthenticated));
        assert_eq!(router.current(), View::Login);

        // The login view itself is always reachable.
        router.navigate(View::Login, false).unwrap();
    }

    #[test]
    fn authenticated_navigation() {
        let router = ViewRouter::new();
        router.on_login();
        assert_eq!(router.current(), View::Agents);

        router
            .navigate(
                View::AgentDetail {
                    agent_id: "agent-1".into(),
                },
                true,
            )
            .unwrap();
        router.navigate(View::Reports, true).unwrap();
        assert_eq!(router.current(), View::Reports);
    }

    #[test]
    fn logout_returns_to_login_and_notifies() {
        let router = ViewRouter::new();
        let mut rx = router.subscribe();

        router.on_login();
        router.on_logout();

        assert!(rx.has_changed().unwrap());
        assert_eq!(router.current(), View::Login);
    }
}
