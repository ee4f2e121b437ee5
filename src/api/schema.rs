// Request and response bodies of the dashboard backend, one type per endpoint

use serde::{Deserialize, Serialize};

use crate::athlete::AthleteProfile;
use crate::prediction::{AthleteVitals, TrainingMetrics};

/// Body of `POST /api/v1/auth/login`
#[derive(Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login or registration
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub athlete: AthleteProfile,
}

/// `{ "athlete": ... }` envelope used by both profile endpoints. The GET
/// carries a full profile, the PUT may carry only the changed fields.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ProfileResponse<T> {
    pub athlete: T,
}

/// Body of `POST /api/v1/ml/predict`: vitals and metrics flattened into one object
#[derive(Serialize, Clone, Debug)]
pub struct PredictRequest<'a> {
    #[serde(flatten)]
    pub vitals: &'a AthleteVitals,
    #[serde(flatten)]
    pub metrics: &'a TrainingMetrics,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PredictResponse {
    pub predicted_recovery_days: f64,
}

/// Error body the backend attaches to non-2xx responses
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
