use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, watch};

use crate::api::{ApiError, AuthResponse, Backend, LoginRequest};
use crate::athlete::{AthleteProfile, ProfilePatch, RegistrationForm};
use crate::errors::ReboundError;

use super::credential::CredentialStorage;
use super::state::{AuthStatus, AuthenticatedUser, Session};

const REGISTRATION_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";

/// Whether a login rejection is the backend asking for the account to be verified first.
fn needs_verification(message: &str) -> bool {
    message.to_lowercase().contains("verif")
}

/// Owns the authentication lifecycle of the current user.
///
/// State lives in a watch channel: every mutation notifies subscribers, and a
/// snapshot can be taken at any time. `epoch` increases whenever the session
/// is replaced (login, registration, logout), which lets a restoration or a
/// profile update that settles late notice it no longer applies.
pub struct SessionStore<B> {
    backend: Arc<B>,
    credentials: Arc<dyn CredentialStorage>,
    state: watch::Sender<Session>,
    restore_lock: Mutex<()>,
    epoch: AtomicU64,
}

impl<B: Backend> SessionStore<B> {
    pub fn new(backend: Arc<B>, credentials: Arc<dyn CredentialStorage>) -> Self {
        Self {
            backend,
            credentials,
            state: watch::Sender::new(Session::default()),
            restore_lock: Mutex::new(()),
            epoch: AtomicU64::new(0),
        }
    }

    /// Receive a notification on every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Bearer credential of the current session, read at call time
    pub fn credential(&self) -> Option<String> {
        self.state.borrow().credential().map(str::to_string)
    }

    pub fn athlete(&self) -> Option<AthleteProfile> {
        self.state.borrow().athlete().cloned()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status
    }

    /// Start an operation and return the epoch it started in
    fn begin_operation(&self) -> u64 {
        self.state.send_modify(|session| {
            session.in_flight += 1;
            session.last_error = None;
        });
        self.epoch.load(Ordering::SeqCst)
    }

    fn end_operation(&self) {
        self.state
            .send_modify(|session| session.in_flight = session.in_flight.saturating_sub(1));
    }

    /// End an operation with `error` recorded as the last error
    fn fail(&self, error: ReboundError) -> ReboundError {
        let message = error.to_string();
        self.state.send_modify(|session| {
            session.in_flight = session.in_flight.saturating_sub(1);
            session.last_error = Some(message);
        });
        error
    }

    /// Record `error` for a call refused before any operation started
    fn refuse(&self, error: ReboundError) -> ReboundError {
        let message = error.to_string();
        self.state
            .send_modify(|session| session.last_error = Some(message));
        error
    }

    /// Install a freshly issued credential and profile as the current session.
    ///
    /// If the session was replaced or logged out since `epoch`, the profile is
    /// only returned: nothing is persisted and the newer session is kept.
    fn establish(&self, response: AuthResponse, epoch: u64) -> AthleteProfile {
        let AuthResponse { token, athlete } = response;

        if self
            .epoch
            .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!(
                "Session changed while signing in as {}, discarding the new credential",
                athlete.email
            );
            self.end_operation();
            return athlete;
        }

        // the in-memory session stays valid for this run even if persisting fails
        if let Err(e) = self.credentials.save(&token) {
            warn!("Could not persist credential, session will not survive a restart: {}", e);
        }

        self.state.send_modify(|session| {
            session.user = Some(AuthenticatedUser {
                credential: token,
                athlete: athlete.clone(),
            });
            session.in_flight = session.in_flight.saturating_sub(1);
            session.last_error = None;
        });
        athlete
    }

    /// Create an account and sign in with it.
    ///
    /// The form is expected to be validated already; the backend has the final
    /// word on it. On failure the session is left as it was.
    pub async fn register(&self, form: &RegistrationForm) -> Result<AthleteProfile, ReboundError> {
        let epoch = self.begin_operation();
        info!("Registering athlete {}", form.email);

        match self.backend.register(form).await {
            Ok(response) => {
                let athlete = self.establish(response, epoch);
                info!("Registered and signed in as {}", athlete.email);
                Ok(athlete)
            }
            Err(e) => {
                warn!("Registration of {} failed: {}", form.email, e);
                Err(self.fail(e.into_rebound_error(REGISTRATION_FAILED, |message| {
                    ReboundError::RegistrationFailed { message }
                })))
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// A rejection whose message mentions verification becomes
    /// `AccountNotVerified` with the backend's message untouched, so callers
    /// can point the athlete at their inbox instead of reporting bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AthleteProfile, ReboundError> {
        let epoch = self.begin_operation();
        info!("Logging in as {}", email);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.backend.login(&request).await {
            Ok(response) => Ok(self.establish(response, epoch)),
            Err(e) => {
                warn!("Login of {} failed: {}", email, e);
                Err(self.fail(e.into_rebound_error(LOGIN_FAILED, |message| {
                    if needs_verification(&message) {
                        ReboundError::AccountNotVerified { message }
                    } else {
                        ReboundError::InvalidCredentials { message }
                    }
                })))
            }
        }
    }

    /// Forget the current session in memory and on disk. Safe to call when logged out.
    pub fn logout(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.credentials.clear() {
            error!("Could not remove persisted credential: {}", e);
        }

        let cleared = self.state.send_if_modified(|session| {
            let had_user = session.user.take().is_some();
            let had_error = session.last_error.take().is_some();
            had_user || had_error
        });
        if cleared {
            info!("Logged out");
        }
    }

    /// Restore the session from the persisted credential.
    ///
    /// Always ends in `AuthStatus::Ready`. Without a persisted credential no
    /// request is made. A credential the backend refuses (or any failure to
    /// reach it) is discarded and the session stays logged out. Calls are
    /// serialized. When the session already holds the persisted credential,
    /// restored earlier or issued by a login in this run, it is marked `Ready`
    /// without touching the network.
    pub async fn initialize_auth(&self) {
        let _restoring = self.restore_lock.lock().await;

        let persisted = match self.credentials.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Could not read persisted credential: {}", e);
                None
            }
        };

        let Some(credential) = persisted else {
            debug!("No persisted credential, starting logged out");
            self.state.send_if_modified(mark_ready);
            return;
        };

        let current = self.state.borrow().credential() == Some(credential.as_str());
        if current {
            debug!("Session already holds the persisted credential");
            self.state.send_if_modified(mark_ready);
            return;
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        self.state
            .send_modify(|session| session.status = AuthStatus::Loading);

        let outcome = self.backend.fetch_profile(&credential).await;

        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Session changed while restoring, keeping the newer session");
            self.state.send_if_modified(mark_ready);
            return;
        }

        match outcome {
            Ok(athlete) => {
                info!("Restored session for {}", athlete.email);
                self.state.send_modify(|session| {
                    session.user = Some(AuthenticatedUser { credential, athlete });
                    session.status = AuthStatus::Ready;
                });
            }
            Err(failure) => {
                match failure {
                    ApiError::Rejected { status, .. } => {
                        info!("Persisted credential refused (HTTP {}), logging out", status)
                    }
                    ApiError::Transport { reason } => {
                        warn!("Could not restore session, logging out: {}", reason)
                    }
                }
                if let Err(e) = self.credentials.clear() {
                    error!("Could not remove persisted credential: {}", e);
                }
                self.state.send_modify(|session| {
                    session.user = None;
                    session.status = AuthStatus::Ready;
                });
            }
        }
    }

    /// Change some profile fields of the logged in athlete.
    ///
    /// Fails with `NotAuthenticated` without any request when logged out. On
    /// success the fields returned by the backend overwrite the cached profile
    /// and the merged profile is returned.
    pub async fn update_athlete_profile(
        &self,
        patch: &ProfilePatch,
    ) -> Result<AthleteProfile, ReboundError> {
        let user = self.state.borrow().user.clone();
        let Some(user) = user else {
            return Err(self.refuse(ReboundError::NotAuthenticated));
        };
        let epoch = self.begin_operation();

        let changes = match self.backend.update_profile(&user.credential, patch).await {
            Ok(changes) => changes,
            Err(e) => {
                warn!("Profile update failed: {}", e);
                return Err(self.fail(e.into_rebound_error(PROFILE_UPDATE_FAILED, |message| {
                    ReboundError::ProfileUpdateFailed { message }
                })));
            }
        };

        let mut merged = user.athlete;
        merged.apply(&changes);

        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Session changed during profile update, not caching the result");
            self.end_operation();
            return Ok(merged);
        }

        self.state.send_modify(|session| {
            if let Some(current) = session.user.as_mut() {
                current.athlete.apply(&changes);
            }
            session.in_flight = session.in_flight.saturating_sub(1);
        });
        info!("Updated profile of {}", merged.email);
        Ok(merged)
    }
}

fn mark_ready(session: &mut Session) -> bool {
    if session.status == AuthStatus::Ready {
        return false;
    }
    session.status = AuthStatus::Ready;
    true
}
