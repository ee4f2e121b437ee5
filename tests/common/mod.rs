// Scripted in-memory backend shared by the store integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use rebound::api::{ApiError, AuthResponse, Backend, LoginRequest, PredictRequest};
use rebound::{AthleteProfile, Gender, Position, ProfilePatch, RegistrationForm};
use tokio::sync::Notify;

pub const PASSWORD: &str = "hunter22";

pub fn sample_athlete() -> AthleteProfile {
    AthleteProfile {
        full_name: "Jordan Lee".to_string(),
        email: "jordan@club.com".to_string(),
        age: 24,
        gender: Gender::Male,
        height_cm: 198.,
        weight_kg: 95.5,
        position: Position::Forward,
    }
}

pub fn sample_form() -> RegistrationForm {
    RegistrationForm {
        full_name: "Ana Silva".to_string(),
        email: "ana@club.com".to_string(),
        password: PASSWORD.to_string(),
        age: 21,
        gender: Gender::Female,
        height_cm: 182.,
        weight_kg: 70.,
        position: Position::Guard,
    }
}

/// Backend double keeping accounts and issued tokens in memory.
///
/// Every call is counted before anything else happens. Calls can be made to
/// fail (`fail`, `set_offline`) or held until released (`gate`).
#[derive(Default)]
pub struct FakeBackend {
    accounts: Mutex<HashMap<String, (String, AthleteProfile)>>,
    tokens: Mutex<HashMap<String, String>>,
    unverified: Mutex<HashSet<String>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
    calls: Mutex<Vec<&'static str>>,
    predict_bodies: Mutex<Vec<serde_json::Value>>,
    issued: AtomicUsize,
    offline: AtomicBool,
    prediction_days: Mutex<f64>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.set_prediction(2.5);
        backend
    }

    /// Backend knowing the sample athlete with `PASSWORD`
    pub fn with_sample_account() -> Self {
        let backend = Self::new();
        backend.add_account(PASSWORD, sample_athlete());
        backend
    }

    pub fn add_account(&self, password: &str, athlete: AthleteProfile) {
        self.accounts
            .lock()
            .unwrap()
            .insert(athlete.email.clone(), (password.to_string(), athlete));
    }

    /// Accept `token` as a credential of the account registered under `email`
    pub fn add_token(&self, token: &str, email: &str) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), email.to_string());
    }

    pub fn mark_unverified(&self, email: &str) {
        self.unverified.lock().unwrap().insert(email.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_prediction(&self, days: f64) {
        *self.prediction_days.lock().unwrap() = days;
    }

    /// Make every later `call` fail with `error`
    pub fn fail(&self, call: &'static str, error: ApiError) {
        self.failures.lock().unwrap().insert(call, error);
    }

    /// Hold every later `call` until the returned handle is notified
    pub fn gate(&self, call: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(call, gate.clone());
        gate
    }

    pub fn calls(&self, call: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|made| **made == call)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn predict_bodies(&self) -> Vec<serde_json::Value> {
        self.predict_bodies.lock().unwrap().clone()
    }

    pub fn profile_of(&self, email: &str) -> Option<AthleteProfile> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|(_, athlete)| athlete.clone())
    }

    async fn enter(&self, call: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);

        let gate = self.gates.lock().unwrap().get(call).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Transport {
                reason: "connection refused".to_string(),
            });
        }
        match self.failures.lock().unwrap().get(call) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn issue_token(&self, email: &str) -> String {
        let serial = self.issued.fetch_add(1, Ordering::SeqCst);
        let token = format!("token-{}", serial);
        self.add_token(&token, email);
        token
    }

    fn account_for(&self, credential: &str) -> Result<String, ApiError> {
        self.tokens
            .lock()
            .unwrap()
            .get(credential)
            .cloned()
            .ok_or(ApiError::Rejected {
                status: 401,
                message: Some("Invalid or expired token".to_string()),
            })
    }
}

impl Backend for FakeBackend {
    async fn register(&self, form: &RegistrationForm) -> Result<AuthResponse, ApiError> {
        self.enter("register").await?;

        let athlete = AthleteProfile {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            age: form.age,
            gender: form.gender,
            height_cm: form.height_cm,
            weight_kg: form.weight_kg,
            position: form.position,
        };
        {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(&form.email) {
                return Err(ApiError::Rejected {
                    status: 409,
                    message: Some("Email already registered".to_string()),
                });
            }
            accounts.insert(form.email.clone(), (form.password.clone(), athlete.clone()));
        }
        Ok(AuthResponse {
            token: self.issue_token(&form.email),
            athlete,
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.enter("login").await?;

        let account = self.accounts.lock().unwrap().get(&request.email).cloned();
        let athlete = match account {
            Some((password, athlete)) if password == request.password => athlete,
            _ => {
                return Err(ApiError::Rejected {
                    status: 401,
                    message: Some("Invalid email or password".to_string()),
                });
            }
        };
        if self.unverified.lock().unwrap().contains(&request.email) {
            return Err(ApiError::Rejected {
                status: 403,
                message: Some("Please verify your email before logging in".to_string()),
            });
        }
        Ok(AuthResponse {
            token: self.issue_token(&request.email),
            athlete,
        })
    }

    async fn fetch_profile(&self, credential: &str) -> Result<AthleteProfile, ApiError> {
        self.enter("fetch_profile").await?;

        let email = self.account_for(credential)?;
        self.profile_of(&email).ok_or(ApiError::Rejected {
            status: 404,
            message: Some("Athlete not found".to_string()),
        })
    }

    async fn update_profile(
        &self,
        credential: &str,
        patch: &ProfilePatch,
    ) -> Result<ProfilePatch, ApiError> {
        self.enter("update_profile").await?;

        let email = self.account_for(credential)?;
        if let Some((_, athlete)) = self.accounts.lock().unwrap().get_mut(&email) {
            athlete.apply(patch);
        }
        Ok(patch.clone())
    }

    async fn predict(
        &self,
        credential: &str,
        request: &PredictRequest<'_>,
    ) -> Result<f64, ApiError> {
        if let Ok(body) = serde_json::to_value(request) {
            self.predict_bodies.lock().unwrap().push(body);
        }
        self.enter("predict").await?;

        self.account_for(credential)?;
        Ok(*self.prediction_days.lock().unwrap())
    }
}
