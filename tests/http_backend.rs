// Wire-level tests of the HTTP backend against a one-shot local server

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use rebound::api::{ApiError, Backend, LoginRequest, PredictRequest};
use rebound::{AthleteVitals, ClientConfig, Gender, HttpBackend, ProfilePatch, TrainingMetrics};

const ATHLETE_JSON: &str = r#"{"fullName":"Jordan Lee","email":"jordan@club.com","age":24,"gender":"Male","heightCm":198.0,"weightKg":95.5,"position":"Forward"}"#;

/// Request as received by the server
struct Received {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Received {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Accept a single connection, answer it with `status` and `body`, and hand back what was received
fn serve_once(status: &'static str, body: String) -> (HttpBackend, JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let config = ClientConfig {
        base_url: format!("http://{}/", listener.local_addr().unwrap()),
        ..Default::default()
    };

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.parse::<usize>().unwrap())
            .unwrap_or(0);
        let mut request_body = vec![0; length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();

        Received {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8(request_body).unwrap(),
        }
    });

    (HttpBackend::new(&config).unwrap(), handle)
}

#[test]
fn test_base_url_trailing_slash_is_trimmed() {
    let config = ClientConfig {
        base_url: "http://localhost:5000/".to_string(),
        ..Default::default()
    };
    let backend = HttpBackend::new(&config).unwrap();
    assert_eq!(backend.base_url(), "http://localhost:5000");
}

#[tokio::test]
async fn test_login_posts_credentials() {
    let (backend, server) = serve_once(
        "200 OK",
        format!(r#"{{"token":"abc","athlete":{}}}"#, ATHLETE_JSON),
    );

    let response = backend
        .login(&LoginRequest {
            email: "jordan@club.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.token, "abc");
    assert_eq!(response.athlete.full_name, "Jordan Lee");
    assert_eq!(response.athlete.gender, Gender::Male);

    let received = server.join().unwrap();
    assert_eq!(received.request_line, "POST /api/v1/auth/login HTTP/1.1");
    assert!(received.header("authorization").is_none());
    let body = received.json();
    assert_eq!(body["email"], "jordan@club.com");
    assert_eq!(body["password"], "hunter22");
}

#[tokio::test]
async fn test_fetch_profile_sends_bearer_credential() {
    let (backend, server) = serve_once("200 OK", format!(r#"{{"athlete":{}}}"#, ATHLETE_JSON));

    let athlete = backend.fetch_profile("abc").await.unwrap();
    assert_eq!(athlete.email, "jordan@club.com");

    let received = server.join().unwrap();
    assert_eq!(received.request_line, "GET /api/v1/auth/profile HTTP/1.1");
    assert_eq!(received.header("authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn test_update_profile_sends_only_changed_fields() {
    let (backend, server) = serve_once("200 OK", r#"{"athlete":{"weightKg":97.0}}"#.to_string());

    let patch = ProfilePatch {
        weight_kg: Some(97.),
        ..Default::default()
    };
    let changes = backend.update_profile("abc", &patch).await.unwrap();
    assert_eq!(changes, patch);

    let received = server.join().unwrap();
    assert_eq!(received.request_line, "PUT /api/v1/auth/profile HTTP/1.1");
    assert_eq!(received.json(), serde_json::json!({ "weightKg": 97.0 }));
}

#[tokio::test]
async fn test_predict_sends_flat_body() {
    let (backend, server) = serve_once(
        "200 OK",
        r#"{"predicted_recovery_days":3.25}"#.to_string(),
    );
    let vitals = AthleteVitals {
        age: 24,
        height_cm: 198.,
        weight_kg: 95.5,
        gender: Gender::Female,
    };
    let metrics = TrainingMetrics::default();

    let days = backend
        .predict(
            "abc",
            &PredictRequest {
                vitals: &vitals,
                metrics: &metrics,
            },
        )
        .await
        .unwrap();
    assert_eq!(days, 3.25);

    let received = server.join().unwrap();
    assert_eq!(received.request_line, "POST /api/v1/ml/predict HTTP/1.1");
    assert_eq!(received.header("authorization"), Some("Bearer abc"));
    assert_eq!(
        received.json(),
        serde_json::json!({
            "Age": 24,
            "Height_cm": 198.0,
            "Weight_kg": 95.5,
            "Gender": "female",
            "Training_Intensity": 5,
            "Training_Hours_Per_Week": 10.0,
            "Match_Count_Per_Week": 2,
            "Fatigue_Score": 5,
            "ACL_Risk_Score": 3,
        })
    );
}

#[tokio::test]
async fn test_rejection_keeps_backend_message() {
    let (backend, server) = serve_once(
        "401 Unauthorized",
        r#"{"message":"Invalid email or password"}"#.to_string(),
    );

    let err = backend
        .login(&LoginRequest {
            email: "jordan@club.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 401,
            message: Some("Invalid email or password".to_string()),
        }
    );
    server.join().unwrap();
}

#[tokio::test]
async fn test_rejection_without_json_body() {
    let (backend, server) = serve_once("500 Internal Server Error", "oops".to_string());

    let err = backend.fetch_profile("abc").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 500,
            message: None,
        }
    );
    server.join().unwrap();
}

#[tokio::test]
async fn test_malformed_success_is_transport_failure() {
    let (backend, server) = serve_once("200 OK", r#"{"unexpected":true}"#.to_string());

    let err = backend.fetch_profile("abc").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { ref reason } if reason.starts_with("malformed response")));
    server.join().unwrap();
}

#[tokio::test]
async fn test_unreachable_backend() {
    // bind and release a port so nothing listens on it
    let address = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = ClientConfig {
        base_url: format!("http://{}", address),
        ..Default::default()
    };
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.fetch_profile("abc").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}
