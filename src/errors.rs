// Error types for rebound

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum ReboundError {
    // User input validation errors, raised before any store is called
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },

    // Authentication errors
    #[snafu(display("{message}"))]
    InvalidCredentials { message: String },
    #[snafu(display("{message}"))]
    AccountNotVerified { message: String },
    #[snafu(display("{message}"))]
    RegistrationFailed { message: String },
    #[snafu(display("Not authenticated"))]
    NotAuthenticated,

    // Profile errors
    #[snafu(display("{message}"))]
    ProfileUpdateFailed { message: String },

    // Prediction errors
    #[snafu(display("{message}"))]
    PredictionFailed { message: String },

    // Network unreachable or malformed response
    #[snafu(display("Could not reach the backend: {reason}"))]
    TransportFailure { reason: String },

    // Config management errors
    #[snafu(display("Could not find application data directory"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Local persistence errors
    #[snafu(display("Error accessing stored credential"))]
    CredentialIOError { source: io::Error },
    #[snafu(display("Error accessing prediction history"))]
    HistoryIOError { source: io::Error },
}

impl ReboundError {
    /// Whether this error came from the login flow telling us the account still has to be verified.
    pub fn is_unverified_account(&self) -> bool {
        matches!(self, ReboundError::AccountNotVerified { .. })
    }
}
