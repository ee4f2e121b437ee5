// Library interface for rebound
// Front ends (the bundled CLI included) build an AppContext and drive the stores through it

pub mod api;
pub mod athlete;
pub mod config;
pub mod context;
pub mod errors;
pub mod prediction;
pub mod session;

// Re-export commonly used types
pub use api::{Backend, HttpBackend};
pub use athlete::{AthleteProfile, Gender, Position, ProfilePatch, RegistrationForm, RegistrationWizard};
pub use config::ClientConfig;
pub use context::AppContext;
pub use errors::ReboundError;
pub use prediction::{
    AthleteVitals, PredictionRequest, PredictionStatus, PredictionStore, TrainingMetrics,
    format_recovery_time,
};
pub use session::{AccessDecision, AuthStatus, Session, SessionStore};
