//! Shared helpers for HTTP-level integration tests: request senders, a
//! multipart body builder, and scriptable doubles for the payment gateway
//! and the generation backend.

// Each test binary compiles this module separately and none uses every
// helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use fadecast_api::config::ServerConfig;
use fadecast_api::router::build_app_router;
use fadecast_api::state::AppState;
use fadecast_core::MinorUnits;
use fadecast_credentials::{CredentialLifecycle, MemoryCredentialStore};
use fadecast_openai::OpenAiError;
use fadecast_pipeline::{GenerationBackend, GenerationPipeline};
use fadecast_stripe::{GatewayError, PaymentGateway, PaymentHandle, PaymentIntentStatus};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Payment gateway double with a scriptable settlement status.
pub struct ScriptedGateway {
    status: Mutex<PaymentIntentStatus>,
    fail_next: AtomicBool,
    pub opened: AtomicUsize,
    pub status_calls: AtomicUsize,
}

impl ScriptedGateway {
    /// New gateway whose intents report `status` until changed.
    pub fn new(status: PaymentIntentStatus) -> Self {
        Self {
            status: Mutex::new(status),
            fail_next: AtomicBool::new(false),
            opened: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Change what `get_status` reports, as if the payment progressed.
    pub fn set_status(&self, status: PaymentIntentStatus) {
        *self.status.lock().unwrap() = status;
    }

    /// Make the next gateway call fail with an API error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> Result<(), GatewayError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(GatewayError::Api {
                status: 500,
                body: "processor unavailable".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn open_payment(
        &self,
        _amount: MinorUnits,
        _currency: &str,
    ) -> Result<PaymentHandle, GatewayError> {
        self.take_failure()?;
        let n = self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentHandle {
            intent_id: format!("pi_test_{n}"),
            client_secret: format!("pi_test_{n}_secret_test"),
        })
    }

    async fn get_status(&self, _intent_id: &str) -> Result<PaymentIntentStatus, GatewayError> {
        self.take_failure()?;
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.status.lock().unwrap())
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Generation backend double with independently failable stages.
pub struct ScriptedBackend {
    describe_fails: AtomicBool,
    synthesize_fails: AtomicBool,
    pub describe_calls: AtomicUsize,
    pub synthesize_calls: AtomicUsize,
    /// Prompt the synthesis stage last received.
    pub last_prompt: Mutex<Option<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            describe_fails: AtomicBool::new(false),
            synthesize_fails: AtomicBool::new(false),
            describe_calls: AtomicUsize::new(0),
            synthesize_calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn fail_describe(&self) {
        self.describe_fails.store(true, Ordering::SeqCst);
    }

    pub fn fail_synthesize(&self) {
        self.synthesize_fails.store(true, Ordering::SeqCst);
    }

    /// Clear all scripted failures.
    pub fn recover(&self) {
        self.describe_fails.store(false, Ordering::SeqCst);
        self.synthesize_fails.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn describe(&self, _data_uri: &str) -> Result<String, OpenAiError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if self.describe_fails.load(Ordering::SeqCst) {
            return Err(OpenAiError::Api {
                status: 500,
                body: "vision model unavailable".into(),
            });
        }
        Ok("A faded rose on the forearm in red and green ink".into())
    }

    async fn synthesize(&self, prompt: &str) -> Result<String, OpenAiError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        if self.synthesize_fails.load(Ordering::SeqCst) {
            return Err(OpenAiError::Api {
                status: 500,
                body: "image model unavailable".into(),
            });
        }
        Ok("https://images.example/aged-preview.png".into())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A fully wired test application plus handles to the doubles behind it.
pub struct TestApp {
    pub app: Router,
    pub gateway: Arc<ScriptedGateway>,
    pub backend: Arc<ScriptedBackend>,
    pub store: Arc<MemoryCredentialStore>,
    /// Owns the upload directory for the lifetime of the test.
    pub upload_dir: TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. Uploads land in `upload_dir`.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        payment_amount_minor: 299,
        payment_currency: "gbp".to_string(),
        gateway_mode: "live".to_string(),
        stripe_secret_key: Some("sk_test_unused".to_string()),
        stripe_api_base: "https://stripe.invalid".to_string(),
        gateway_timeout_secs: 5,
        openai_api_key: "test-key".to_string(),
        openai_api_base: "https://openai.invalid/v1".to_string(),
        openai_timeout_secs: 5,
        vision_model: "gpt-4o".to_string(),
        image_model: "dall-e-3".to_string(),
        upload_dir: upload_dir.to_path_buf(),
        credential_ttl_mins: 60,
    }
}

/// Build the full application router over scripted doubles.
///
/// New payments report `RequiresPaymentMethod` until a test advances the
/// gateway with [`ScriptedGateway::set_status`]. The router carries the
/// same middleware stack production uses (`build_app_router`).
pub fn build_test_app() -> TestApp {
    let upload_dir = TempDir::new().expect("create temp upload dir");
    let config = test_config(upload_dir.path());

    let gateway = Arc::new(ScriptedGateway::new(
        PaymentIntentStatus::RequiresPaymentMethod,
    ));
    let backend = Arc::new(ScriptedBackend::new());
    let store = Arc::new(MemoryCredentialStore::new());

    let lifecycle = Arc::new(CredentialLifecycle::new(
        store.clone(),
        gateway.clone(),
        config.payment_amount_minor,
        config.payment_currency.clone(),
    ));
    let pipeline = Arc::new(GenerationPipeline::new(backend.clone()));

    let state = AppState {
        config: Arc::new(config.clone()),
        lifecycle,
        pipeline,
    };

    TestApp {
        app: build_app_router(state, &config),
        gateway,
        backend,
        store,
        upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a bodyless POST request to the app.
pub async fn post(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body to the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a multipart body to the app.
pub async fn post_multipart(app: Router, uri: &str, form: MultipartForm) -> Response {
    let content_type = form.content_type();
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(form.into_body()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}

// ---------------------------------------------------------------------------
// Multipart form builder
// ---------------------------------------------------------------------------

/// Minimal `multipart/form-data` body builder for upload tests.
pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "test-boundary-7MA4YWxkTrZu0gW",
            body: Vec::new(),
        }
    }

    /// Append a text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file field.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a file field whose part carries no `Content-Type` header.
    pub fn file_without_type(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The `Content-Type` header value for this form.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Finish the body with the closing boundary.
    pub fn into_body(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// PNG magic followed by zero padding up to `total_len` bytes. Enough for
/// format sniffing, which only inspects the signature.
pub fn png_bytes(total_len: usize) -> Vec<u8> {
    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n";
    let mut bytes = PNG_HEADER.to_vec();
    bytes.resize(total_len.max(PNG_HEADER.len()), 0);
    bytes
}

/// Drive a credential through issue and settlement, returning its id.
///
/// Uses the public endpoints end to end: open the payment, advance the
/// scripted gateway to `succeeded`, then verify.
pub async fn settled_credential(test: &TestApp) -> String {
    let response = post(test.app.clone(), "/create-payment-intent").await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let created = body_json(response).await;
    let credential_id = created["credentialId"].as_str().unwrap().to_string();

    test.gateway.set_status(PaymentIntentStatus::Succeeded);

    let response = post_json(
        test.app.clone(),
        "/verify-payment",
        serde_json::json!({ "credentialId": credential_id }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    credential_id
}
