// HTTP implementation of the backend contract

use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::athlete::{AthleteProfile, ProfilePatch, RegistrationForm};
use crate::config::ClientConfig;
use crate::errors::ReboundError;

use super::schema::{
    AuthResponse, ErrorBody, LoginRequest, PredictRequest, PredictResponse, ProfileResponse,
};
use super::{ApiError, Backend, LOGIN_PATH, PREDICT_PATH, PROFILE_PATH, REGISTER_PATH};

/// Talks to the dashboard backend over HTTP.
///
/// Requests are sent once: no retry, no timeout and no cancellation. A hung
/// request stays pending until the connection settles.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ReboundError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ReboundError::TransportFailure {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport {
            reason: e.to_string(),
        })?;

        let status = response.status();
        debug!("{} answered with {}", response.url().path(), status);

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| ApiError::Transport {
                reason: format!("malformed response: {}", e),
            });
        }

        // the error body is best effort, a missing or non-JSON body falls back to the caller's message
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(e) => {
                warn!("Could not read error body for HTTP {}: {}", status, e);
                None
            }
        };
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl Backend for HttpBackend {
    async fn register(&self, form: &RegistrationForm) -> Result<AuthResponse, ApiError> {
        self.send(self.client.post(self.url(REGISTER_PATH)).json(form))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send(self.client.post(self.url(LOGIN_PATH)).json(request))
            .await
    }

    async fn fetch_profile(&self, credential: &str) -> Result<AthleteProfile, ApiError> {
        let response: ProfileResponse<AthleteProfile> = self
            .send(
                self.client
                    .get(self.url(PROFILE_PATH))
                    .bearer_auth(credential),
            )
            .await?;
        Ok(response.athlete)
    }

    async fn update_profile(
        &self,
        credential: &str,
        patch: &ProfilePatch,
    ) -> Result<ProfilePatch, ApiError> {
        let response: ProfileResponse<ProfilePatch> = self
            .send(
                self.client
                    .put(self.url(PROFILE_PATH))
                    .bearer_auth(credential)
                    .json(patch),
            )
            .await?;
        Ok(response.athlete)
    }

    async fn predict(
        &self,
        credential: &str,
        request: &PredictRequest<'_>,
    ) -> Result<f64, ApiError> {
        let response: PredictResponse = self
            .send(
                self.client
                    .post(self.url(PREDICT_PATH))
                    .bearer_auth(credential)
                    .json(request),
            )
            .await?;
        Ok(response.predicted_recovery_days)
    }
}
