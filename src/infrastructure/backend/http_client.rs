//! HTTP adapter for the job and voice backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::application::ports::{BackendError, JobBackend, VoiceBackend};
use crate::domain::jobs::{HealthStatus, Job, JobFilter, Language, NewJob, VoiceQueryResult};
use crate::domain::recording::AudioPayload;
use crate::infrastructure::recording::encode_wav;

/// Largest upload the backend accepts
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedJob {
    job: Job,
}

/// Client for the VocaWork REST API
#[derive(Debug, Clone)]
pub struct VocaworkClient {
    base: Url,
    client: reqwest::Client,
}

impl VocaworkClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:5000/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| BackendError::Encoding(format!("invalid API URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::Encoding(format!(
                "invalid API URL '{base_url}'"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Resolve a reply path such as `/api/audio/x.mp3` against the API origin
    fn resolve(&self, location: &str) -> String {
        match self.base.join(location) {
            Ok(url) => url.to_string(),
            Err(_) => location.to_string(),
        }
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        debug!(status = status.as_u16(), ?message, "backend rejected request");
        Err(BackendError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }

    fn audio_form(wav: Vec<u8>, payload: &AudioPayload, language: Language) -> Result<Form, BackendError> {
        let encoding = payload.encoding();
        let audio = Part::bytes(wav)
            .file_name(encoding.file_name())
            .mime_str(encoding.mime_type())
            .map_err(|e| BackendError::Encoding(e.to_string()))?;

        Ok(Form::new()
            .part("audio", audio)
            .text("language", language.code()))
    }
}

#[async_trait]
impl JobBackend for VocaworkClient {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, BackendError> {
        let mut request = self.client.get(self.endpoint(&["jobs"]));
        if let Some(query) = &filter.query {
            request = request.query(&[("query", query)]);
        }
        if let Some(location) = &filter.location {
            request = request.query(&[("location", location)]);
        }
        debug!(query = ?filter.query, location = ?filter.location, "GET /jobs");
        Self::read_json(Self::send(request).await?).await
    }

    async fn create_job(&self, job: &NewJob) -> Result<Job, BackendError> {
        debug!(title = %job.title, "POST /jobs");
        let request = self.client.post(self.endpoint(&["jobs"])).json(job);
        let created: CreatedJob = Self::read_json(Self::send(request).await?).await?;
        Ok(created.job)
    }

    async fn delete_job(&self, id: &str) -> Result<(), BackendError> {
        debug!(%id, "DELETE /jobs/:id");
        let request = self.client.delete(self.endpoint(&["jobs", id]));
        Self::send(request).await?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        let request = self.client.get(self.endpoint(&["health"]));
        Self::read_json(Self::send(request).await?).await
    }
}

#[async_trait]
impl VoiceBackend for VocaworkClient {
    async fn process_voice(
        &self,
        payload: &AudioPayload,
        language: Language,
    ) -> Result<VoiceQueryResult, BackendError> {
        let wav = {
            let payload = payload.clone();
            tokio::task::spawn_blocking(move || encode_wav(&payload))
                .await
                .map_err(|e| BackendError::Encoding(format!("encode task failed: {e}")))?
                .map_err(|e| BackendError::Encoding(e.to_string()))?
        };
        if wav.len() > MAX_UPLOAD_BYTES {
            return Err(BackendError::Encoding(format!(
                "recording is {} bytes, the limit is {MAX_UPLOAD_BYTES}",
                wav.len()
            )));
        }

        debug!(bytes = wav.len(), %language, "POST /process-voice");
        let form = Self::audio_form(wav, payload, language)?;
        let request = self.client.post(self.endpoint(&["process-voice"])).multipart(form);

        let mut result: VoiceQueryResult = Self::read_json(Self::send(request).await?).await?;
        result.audio_url = result
            .audio_url
            .filter(|location| !location.trim().is_empty())
            .map(|location| self.resolve(&location));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> VocaworkClient {
        VocaworkClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoints_append_to_base_path() {
        let c = client("http://localhost:5000/api");
        assert_eq!(c.endpoint(&["jobs"]).as_str(), "http://localhost:5000/api/jobs");
        assert_eq!(
            c.endpoint(&["jobs", "42"]).as_str(),
            "http://localhost:5000/api/jobs/42"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let c = client("http://localhost:5000/api/");
        assert_eq!(c.endpoint(&["health"]).as_str(), "http://localhost:5000/api/health");
    }

    #[test]
    fn job_ids_are_escaped() {
        let c = client("http://localhost:5000/api");
        assert_eq!(
            c.endpoint(&["jobs", "a/b c"]).as_str(),
            "http://localhost:5000/api/jobs/a%2Fb%20c"
        );
    }

    #[test]
    fn reply_path_resolves_against_origin() {
        let c = client("https://jobs.example.com/api");
        assert_eq!(
            c.resolve("/api/audio/response_1.mp3"),
            "https://jobs.example.com/api/audio/response_1.mp3"
        );
        assert_eq!(
            c.resolve("https://cdn.example.com/a.mp3"),
            "https://cdn.example.com/a.mp3"
        );
    }

    #[test]
    fn rejects_invalid_base() {
        let err = VocaworkClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, BackendError::Encoding(_)));
        assert!(VocaworkClient::new("mailto:jobs@example.com", Duration::from_secs(1)).is_err());
    }
}
