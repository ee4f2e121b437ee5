use std::fmt;

use crate::athlete::AthleteProfile;

/// Progress of the session restoration done at start-up
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// Restoration has not started
    #[default]
    Idle,
    /// Checking a persisted credential against the backend
    Loading,
    /// Restoration finished, whatever the outcome
    Ready,
}

/// Credential and profile of a logged in athlete. They only ever exist together.
#[derive(Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub credential: String,
    pub athlete: AthleteProfile,
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("credential", &"<redacted>")
            .field("athlete", &self.athlete)
            .finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user: Option<AuthenticatedUser>,
    pub status: AuthStatus,
    /// Logins, registrations and profile updates still in flight
    pub in_flight: u32,
    pub last_error: Option<String>,
}

impl Session {
    pub fn credential(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.credential.as_str())
    }

    pub fn athlete(&self) -> Option<&AthleteProfile> {
        self.user.as_ref().map(|user| &user.athlete)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.status == AuthStatus::Ready
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}
