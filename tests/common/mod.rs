use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shule::router::init_router;
use shule::shule_config::{CorsConfig, ServerConfig};
use shule::shule_structure::InMemoryPersistence;
use shule::state::AppState;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<InMemoryPersistence>,
}

pub fn setup_test_app() -> TestApp {
    let backend = Arc::new(InMemoryPersistence::new());
    let state = AppState::new(
        backend.clone(),
        CorsConfig::default(),
        ServerConfig::default(),
    );
    TestApp {
        router: init_router(state),
        backend,
    }
}

impl TestApp {
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Opens a draft session and returns its id.
    pub async fn create_session(&self) -> String {
        let (status, body) = self
            .request("POST", "/api/school-structure/sessions", None)
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn intent(&self, id: &str, field: &str, value: Value) -> (StatusCode, Value) {
        self.request(
            "POST",
            &format!("/api/school-structure/sessions/{}/intents", id),
            Some(json!({ "field": field, "value": value })),
        )
        .await
    }

    #[allow(dead_code)]
    pub async fn set_name(&self, id: &str, name: &str) {
        let (status, _) = self
            .request(
                "PUT",
                &format!("/api/school-structure/sessions/{}/profile", id),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}
