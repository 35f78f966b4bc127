use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rps_api::{ApiConfig, router, state::ApiState};
use serde::Deserialize;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

/// A router backed by a throwaway data directory
pub struct TestApp {
    pub client: TestClient,
    pub state: ApiState,
    // Removed on drop
    _data_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config: ApiConfig = envy::from_iter(vec![(
            "DATA_DIR".to_string(),
            data_dir.path().to_string_lossy().into_owned(),
        )])
        .expect("Failed to build test config");

        let state = ApiState::new(&config, None).expect("Failed to create test state");
        let client = TestClient::new(router::router().with_state(state.clone()));

        Self {
            client,
            state,
            _data_dir: data_dir,
        }
    }

    /// A fresh user ID; each test works on its own user
    pub fn user(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Helper to make requests to the test app
#[derive(Clone)]
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, None).await
    }

    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send("POST", uri, Some(serde_json::to_string(body).expect("Failed to serialize body")))
            .await
    }

    pub async fn put_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send("PUT", uri, Some(serde_json::to_string(body).expect("Failed to serialize body")))
            .await
    }

    async fn send(&self, method: &str, uri: &str, json_body: Option<String>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match json_body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }
}
