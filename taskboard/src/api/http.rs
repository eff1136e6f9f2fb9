//! REST backend over HTTP.
//!
//! Every request is sent relative to a configurable base URL
//! (default `http://localhost:3001/api`) and carries
//! `Authorization: Bearer <token>` when a token is configured.
//! Non-2xx responses become [`ApiError::Status`] with the messages of the
//! error body.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use taskboard_proto::envelope::{DataEnvelope, ErrorBody};
use taskboard_proto::project::Project;
use taskboard_proto::task::{CreateTaskRequest, Task, TaskId, TaskStatus, UpdateStatusRequest};

use super::{ApiError, Backend};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";

/// Settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// API base URL; request paths are appended to it.
    pub base_url: String,
    /// Bearer token, sent on every request when present.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(15),
        }
    }
}

/// [`Backend`] implementation backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpBackend {
    /// Builds a backend from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL doesn't parse or
    /// can't have path segments, and [`ApiError::Transport`] if the HTTP
    /// client can't be built.
    pub fn new(config: &HttpConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and decodes a 2xx JSON body as `T`.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let bytes = self.send(request).await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let url = response.url().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "request succeeded");
            return Ok(bytes.to_vec());
        }

        let messages = ErrorBody::parse(&bytes).messages();
        tracing::debug!(%url, status = status.as_u16(), ?messages, "request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            messages,
        })
    }
}

impl Backend for HttpBackend {
    async fn fetch_tasks(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(&["task", "project", project_id])?;
        let envelope: DataEnvelope<Vec<Task>> = self.send_json(self.client.get(url)).await?;
        Ok(envelope.data)
    }

    async fn update_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<(), ApiError> {
        let url = self.endpoint(&["task", task_id.as_str(), "status"])?;
        let body = UpdateStatusRequest { status };
        // The updated task in the response is ignored; callers re-fetch.
        self.send(self.client.put(url).json(&body)).await?;
        Ok(())
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        let url = self.endpoint(&["task"])?;
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn fetch_project(&self, project_id: &str) -> Result<Project, ApiError> {
        let url = self.endpoint(&["project", project_id])?;
        let envelope: DataEnvelope<Project> = self.send_json(self.client.get(url)).await?;
        Ok(envelope.data)
    }
}
