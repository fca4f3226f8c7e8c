//! HTTP client for the feedback API.

use async_trait::async_trait;
use chrono::Utc;
use feedback_core::{Form, SchemaError, Submission, SubmitReceipt, SubmitTransport};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::analytics::{CourseAnalytics, CourseTrend, TeacherAnalytics};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response. `message` is the server's `error` field when present.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid form: {0}")]
    Schema(#[from] SchemaError),
}

/// Client for the `/api` endpoints of the feedback server.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    /// `base_url` should be like `http://localhost:5000/api`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a form definition and build its schema.
    pub async fn get_form(&self, form_id: &str) -> Result<Form, ApiError> {
        let url = self.url(&format!("forms/{form_id}"));
        info!(url = %url, "fetching form");
        let body = self.send(self.client.get(&url)).await?;
        let form = Form::from_slice(&body)?;
        info!(form_id = %form.id(), questions = form.questions().len(), "form loaded");
        Ok(form)
    }

    /// Post a submission body to `/forms/{id}/submit`.
    pub async fn submit_form(
        &self,
        form_id: &str,
        submission: &Submission,
    ) -> Result<SubmitReceipt, ApiError> {
        let url = self.url(&format!("forms/{form_id}/submit"));
        info!(
            url = %url,
            answers = submission.answers.len(),
            anonymous = submission.is_anonymous,
            "submitting feedback"
        );
        let body = self.send(self.client.post(&url).json(submission)).await?;
        let id = serde_json::from_slice::<SubmitResponse>(&body)
            .ok()
            .and_then(|r| r.id);
        info!(id = ?id, "submission accepted");
        Ok(SubmitReceipt {
            id,
            submitted_at: Utc::now(),
        })
    }

    pub async fn teacher_analytics(&self) -> Result<TeacherAnalytics, ApiError> {
        self.get_json("teacher/analytics").await
    }

    pub async fn course_analytics(&self, course_id: &str) -> Result<CourseAnalytics, ApiError> {
        self.get_json(&format!("courses/{course_id}/analytics")).await
    }

    pub async fn trends(&self, teacher_id: &str) -> Result<Vec<CourseTrend>, ApiError> {
        self.get_json(&format!("trends/{teacher_id}")).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        info!(url = %url, "fetching");
        let body = self.send(self.client.get(&url)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SubmitTransport for ApiClient {
    type Error = ApiError;

    async fn submit(
        &self,
        form_id: &str,
        submission: &Submission,
    ) -> Result<SubmitReceipt, Self::Error> {
        self.submit_form(form_id, submission).await
    }
}

/// The server's `{"error": "..."}` message, or `HTTP <status>`.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/api/".into());
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.url("forms/f-1/submit"),
            "http://localhost:5000/api/forms/f-1/submit"
        );
    }

    #[test]
    fn token_is_optional() {
        let client = ApiClient::new("http://localhost:5000/api".into());
        assert!(client.token.is_none());
        let client = client.with_token("abc");
        assert_eq!(client.token.as_deref(), Some("abc"));
    }

    #[test]
    fn server_error_message_is_preferred() {
        assert_eq!(
            error_message(404, r#"{"error": "Form not found or inactive"}"#),
            "Form not found or inactive"
        );
    }

    #[test]
    fn falls_back_to_status_line() {
        assert_eq!(error_message(502, "<html>Bad Gateway</html>"), "HTTP 502");
        assert_eq!(error_message(500, r#"{"error": ""}"#), "HTTP 500");
        assert_eq!(error_message(401, ""), "HTTP 401");
    }

    #[test]
    fn server_error_displays_only_the_message() {
        let err = ApiError::Server {
            status: 400,
            message: "Missing required field: answers".into(),
        };
        assert_eq!(err.to_string(), "Missing required field: answers");
    }

    #[test]
    fn submit_response_id_is_optional() {
        let r: SubmitResponse =
            serde_json::from_str(r#"{"message": "Feedback submitted successfully", "id": "r-7"}"#)
                .unwrap();
        assert_eq!(r.id.as_deref(), Some("r-7"));
        let r: SubmitResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(r.id.is_none());
    }
}
