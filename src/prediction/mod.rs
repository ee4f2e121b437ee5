// Recovery-time prediction: model inputs, request tracking, formatting and history

pub mod format;
pub mod history;
pub mod store;
pub mod types;

pub use format::{RecoveryTime, format_recovery_time};
pub use history::{PredictionHistory, PredictionRecord};
pub use store::{PredictionRequest, PredictionStatus, PredictionStore};
pub use types::{AthleteVitals, TrainingMetrics};
