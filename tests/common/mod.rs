use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use lab_analytics::{
    Server,
    test_utils::{TestServerBuilder, seed_sample_data},
};
use serde_json::Value;
use tower::ServiceExt;

/// Test harness wrapping an app backed by an in-memory database
pub struct TestHarness {
    #[allow(dead_code)]
    pub server: Server,
    pub app: Router,
}

impl TestHarness {
    /// App over an empty database
    pub async fn empty() -> Self {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();
        Self { server, app }
    }

    /// App over the demo dataset
    pub async fn seeded() -> Self {
        let server = TestServerBuilder::new().build().await;
        seed_sample_data(&server.database).await;
        let app = server.create_app();
        Self { server, app }
    }

    /// GET `uri` and return the status with the raw body
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    /// GET `uri` and parse the JSON body
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = self.get_raw(uri).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

/// Compare JSON amounts without tripping over float formatting
#[allow(dead_code)]
pub fn assert_amount(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"));
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
