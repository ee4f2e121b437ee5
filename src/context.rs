use std::sync::Arc;

use crate::api::Backend;
use crate::prediction::{PredictionHistory, PredictionStore};
use crate::session::{CredentialStorage, SessionStore};

/// The stores of one running dashboard, built once at start-up and handed to
/// whatever needs them.
pub struct AppContext<B> {
    pub session: Arc<SessionStore<B>>,
    pub prediction: PredictionStore<B>,
}

impl<B: Backend> AppContext<B> {
    pub fn new(backend: B, credentials: Arc<dyn CredentialStorage>) -> Self {
        let backend = Arc::new(backend);
        let session = Arc::new(SessionStore::new(backend.clone(), credentials));
        let prediction = PredictionStore::new(backend, session.clone());
        Self {
            session,
            prediction,
        }
    }

    /// Record successful predictions in `history`
    pub fn with_history(mut self, history: PredictionHistory) -> Self {
        self.prediction = self.prediction.with_history(history);
        self
    }
}
