//! REST client for the school backend.
//!
//! Committed structures are POSTed as a [`SchoolRecord`] to
//! `{SHULE_BACKEND_URL}/api/schools`. Any 2xx answer is the acknowledgment that
//! locks the configuration. Before that, `GET /api/schools?name=` lists the
//! records already stored for the school, newest first.

use std::sync::Arc;

use anyhow::Context;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use shule_config::BackendConfig;
use shule_models::SchoolRecord;
use shule_structure::persistence::same_school;
use shule_structure::{
    InMemoryPersistence, LatestFuture, PersistFuture, PersistenceError, StructurePersistence,
};
use tracing::{Instrument, debug, info, info_span, warn};

const MAX_MESSAGE_LEN: usize = 300;

pub struct RestSchoolApi {
    client: Client,
    config: BackendConfig,
}

impl RestSchoolApi {
    pub fn new(config: BackendConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build backend HTTP client")?;
        Ok(Self { client, config })
    }

    async fn post_record(&self, record: &SchoolRecord) -> Result<(), PersistenceError> {
        let url = self.config.schools_url();
        let mut request = self.client.post(&url).json(record);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, http.url = %url, "School backend unreachable");
            PersistenceError::Transport(e.to_string())
        })?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());

        if status.is_success() {
            debug!(http.status_code = status.as_u16(), "School record acknowledged");
            return Ok(());
        }

        let rejection = rejection(response).await;
        warn!(http.status_code = status.as_u16(), error = %rejection, "School backend rejected the record");
        Err(rejection)
    }

    async fn find_latest(&self, name: &str) -> Result<Option<SchoolRecord>, PersistenceError> {
        let url = self.config.schools_url();
        let mut request = self.client.get(&url).query(&[("name", name)]);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, http.url = %url, "School backend unreachable");
            PersistenceError::Transport(e.to_string())
        })?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let rejection = rejection(response).await;
            warn!(http.status_code = status.as_u16(), error = %rejection, "School lookup refused");
            return Err(rejection);
        }

        let records: Vec<SchoolRecord> = response.json().await.map_err(|e| {
            warn!(error = %e, "Unreadable school list");
            PersistenceError::Transport(format!("unreadable school list: {}", e))
        })?;
        Ok(records
            .into_iter()
            .find(|record| same_school(&record.profile.name, name)))
    }
}

async fn rejection(response: Response) -> PersistenceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = backend_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    PersistenceError::Rejected {
        status: status.as_u16(),
        message,
    }
}

impl StructurePersistence for RestSchoolApi {
    fn persist<'a>(&'a self, record: &'a SchoolRecord) -> PersistFuture<'a> {
        let span = info_span!(
            "http.client",
            service.name = "school-backend",
            http.method = "POST",
            http.url = %self.config.schools_url(),
            http.status_code = tracing::field::Empty,
            otel.kind = "client"
        );
        Box::pin(self.post_record(record).instrument(span))
    }

    fn latest<'a>(&'a self, name: &'a str) -> LatestFuture<'a> {
        let span = info_span!(
            "http.client",
            service.name = "school-backend",
            http.method = "GET",
            http.url = %self.config.schools_url(),
            http.status_code = tracing::field::Empty,
            otel.kind = "client"
        );
        Box::pin(self.find_latest(name).instrument(span))
    }
}

/// Pulls a readable message out of an error body.
///
/// JSON bodies are searched for `error`, `message` or `detail`; anything else
/// is used as plain text, truncated.
fn backend_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let message = ["error", "message", "detail"]
            .iter()
            .find_map(|key| json.get(key))
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        if message.is_some() {
            return message;
        }
    }

    Some(body.chars().take(MAX_MESSAGE_LEN).collect())
}

/// Picks the persistence backend named by the configuration.
pub fn init_backend(config: &BackendConfig) -> anyhow::Result<Arc<dyn StructurePersistence>> {
    if config.is_in_memory() {
        info!("Using in-memory school backend");
        return Ok(Arc::new(InMemoryPersistence::new()));
    }

    info!(backend.url = %config.base_url, "Using REST school backend");
    Ok(Arc::new(RestSchoolApi::new(config.clone())?))
}
