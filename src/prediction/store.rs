use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::api::{Backend, PredictRequest};
use crate::errors::ReboundError;
use crate::session::SessionStore;

use super::history::{PredictionHistory, PredictionRecord};
use super::types::{AthleteVitals, TrainingMetrics};

const PREDICTION_FAILED: &str = "Prediction failed";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PredictionStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// State of the most recent prediction request.
///
/// `result_days` is only set when `Succeeded`, `error` only when `Failed`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictionRequest {
    pub status: PredictionStatus,
    pub result_days: Option<f64>,
    pub error: Option<String>,
    /// Generation this state belongs to, see [`PredictionStore`]
    pub generation: u64,
}

/// Tracks one recovery-time prediction at a time.
///
/// Each submission and each reset starts a new generation. A request that
/// settles after its generation has been superseded still returns its outcome
/// to the caller that awaited it, but does not touch the shared state.
pub struct PredictionStore<B> {
    backend: Arc<B>,
    session: Arc<SessionStore<B>>,
    state: watch::Sender<PredictionRequest>,
    generation: AtomicU64,
    history: Option<PredictionHistory>,
}

impl<B: Backend> PredictionStore<B> {
    pub fn new(backend: Arc<B>, session: Arc<SessionStore<B>>) -> Self {
        Self {
            backend,
            session,
            state: watch::Sender::new(PredictionRequest::default()),
            generation: AtomicU64::new(0),
            history: None,
        }
    }

    /// Record every successful prediction in `history`
    pub fn with_history(mut self, history: PredictionHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<PredictionRequest> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PredictionRequest {
        self.state.borrow().clone()
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Ask the recovery model how many days the athlete needs to recover.
    ///
    /// Requires a logged in session: without a credential this fails with
    /// `NotAuthenticated` and no request is sent. There is no retry or timeout,
    /// the state stays `InFlight` until the request settles.
    pub async fn predict_recovery_time(
        &self,
        vitals: &AthleteVitals,
        metrics: &TrainingMetrics,
    ) -> Result<f64, ReboundError> {
        let generation = self.next_generation();

        let Some(credential) = self.session.credential() else {
            let error = ReboundError::NotAuthenticated;
            self.state.send_replace(PredictionRequest {
                status: PredictionStatus::Failed,
                result_days: None,
                error: Some(error.to_string()),
                generation,
            });
            return Err(error);
        };

        self.state.send_replace(PredictionRequest {
            status: PredictionStatus::InFlight,
            result_days: None,
            error: None,
            generation,
        });
        debug!("Requesting recovery prediction, generation {}", generation);

        let request = PredictRequest { vitals, metrics };
        let outcome = self
            .backend
            .predict(&credential, &request)
            .await
            .map_err(|e| {
                e.into_rebound_error(PREDICTION_FAILED, |message| {
                    ReboundError::PredictionFailed { message }
                })
            });

        if let (Ok(days), Some(history)) = (&outcome, &self.history) {
            if let Err(e) = history.append(&PredictionRecord::new(vitals, metrics, *days)) {
                warn!("Could not record prediction in history: {}", e);
            }
        }

        if !self.is_current(generation) {
            debug!("Discarding stale prediction result of generation {}", generation);
            return outcome;
        }

        match &outcome {
            Ok(days) => {
                info!("Predicted recovery time: {:.2} days", days);
                self.state.send_replace(PredictionRequest {
                    status: PredictionStatus::Succeeded,
                    result_days: Some(*days),
                    error: None,
                    generation,
                });
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                self.state.send_replace(PredictionRequest {
                    status: PredictionStatus::Failed,
                    result_days: None,
                    error: Some(e.to_string()),
                    generation,
                });
            }
        }
        outcome
    }

    /// Back to `Idle`. A request still in flight is not aborted, but its result is dropped.
    pub fn reset_prediction(&self) {
        let generation = self.next_generation();
        self.state.send_replace(PredictionRequest {
            generation,
            ..Default::default()
        });
    }
}
