// Backend contract consumed by the stores
//
// `Backend` is the seam between the stores and the network: the stores only
// ever talk to this trait, `HttpBackend` implements it over HTTP.

pub mod http;
pub mod schema;

use std::future::Future;

use snafu::Snafu;

use crate::athlete::{AthleteProfile, ProfilePatch, RegistrationForm};
use crate::errors::ReboundError;

pub use http::HttpBackend;
pub use schema::{AuthResponse, LoginRequest, PredictRequest};

pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const PROFILE_PATH: &str = "/api/v1/auth/profile";
pub const PREDICT_PATH: &str = "/api/v1/ml/predict";

/// Failure of a single backend call, before the stores give it a meaning
#[derive(Debug, Snafu, Clone, PartialEq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status
    #[snafu(display("Backend rejected the request with HTTP {status}"))]
    Rejected { status: u16, message: Option<String> },
    /// The backend could not be reached or sent something unreadable
    #[snafu(display("{reason}"))]
    Transport { reason: String },
}

impl ApiError {
    /// Turn a call failure into the error reported to callers.
    ///
    /// Rejections keep the backend's message (or `fallback` when it sent none)
    /// and are wrapped by `rejected`; transport problems always become
    /// `TransportFailure`.
    pub(crate) fn into_rebound_error(
        self,
        fallback: &str,
        rejected: impl FnOnce(String) -> ReboundError,
    ) -> ReboundError {
        match self {
            ApiError::Rejected { message, .. } => {
                rejected(message.unwrap_or_else(|| fallback.to_string()))
            }
            ApiError::Transport { reason } => ReboundError::TransportFailure { reason },
        }
    }
}

pub trait Backend: Send + Sync {
    /// `POST /api/v1/auth/register`
    fn register(
        &self,
        form: &RegistrationForm,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    /// `POST /api/v1/auth/login`
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    /// `GET /api/v1/auth/profile`
    fn fetch_profile(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<AthleteProfile, ApiError>> + Send;

    /// `PUT /api/v1/auth/profile`, returns the fields the backend reports back
    fn update_profile(
        &self,
        credential: &str,
        patch: &ProfilePatch,
    ) -> impl Future<Output = Result<ProfilePatch, ApiError>> + Send;

    /// `POST /api/v1/ml/predict`, returns the predicted recovery in days
    fn predict(
        &self,
        credential: &str,
        request: &PredictRequest<'_>,
    ) -> impl Future<Output = Result<f64, ApiError>> + Send;
}
