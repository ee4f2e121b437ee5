// Access control for screens that need a logged in athlete

use crate::api::Backend;

use super::state::Session;
use super::store::SessionStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session restoration or an auth request has not settled yet, show a spinner
    Pending,
    Allow,
    RedirectToLogin,
}

impl AccessDecision {
    pub fn for_session(session: &Session) -> Self {
        if !session.is_ready() || session.is_busy() {
            AccessDecision::Pending
        } else if session.is_authenticated() {
            AccessDecision::Allow
        } else {
            AccessDecision::RedirectToLogin
        }
    }
}

/// Finish session restoration if needed, then decide.
///
/// Never returns `Pending` unless an auth request is still in flight elsewhere.
pub async fn resolve_access<B: Backend>(store: &SessionStore<B>) -> AccessDecision {
    if !store.snapshot().is_ready() {
        store.initialize_auth().await;
    }
    AccessDecision::for_session(&store.snapshot())
}
