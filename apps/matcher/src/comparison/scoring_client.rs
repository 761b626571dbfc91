/// Scoring client — the single outbound call of the matcher.
///
/// Canonical response contract (flat):
/// `{ "cv_score": 7.5, "summary": "...", "matching_keywords": [...],
///    "missing_keywords": [...], "success": true, "message": null }`
///
/// The enveloped `{success, result, message}` shape is not accepted and fails
/// to parse. There is no retry and no client-side timeout: a request either
/// completes or fails once.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::comparison::request::ComparisonRequest;
use crate::comparison::result::ComparisonResult;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scoring service error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Scoring service rejected the request: {message}")]
    Rejected { message: String },
}

/// Wire shape returned by the scoring service.
#[derive(Debug, Deserialize)]
pub struct CvScoreResponse {
    pub cv_score: f64,
    #[serde(default)]
    pub summary: String,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CvScoreResponse {
    pub fn into_result(self) -> Result<ComparisonResult, ScoringError> {
        if self.success == Some(false) {
            return Err(ScoringError::Rejected {
                message: self.message.unwrap_or_default(),
            });
        }

        let summary_notes = if self.summary.trim().is_empty() {
            vec![]
        } else {
            vec![self.summary]
        };

        Ok(ComparisonResult::new(
            self.cv_score,
            self.matching_keywords,
            self.missing_keywords,
            summary_notes,
        ))
    }
}

/// The scoring collaborator. `HttpScoringClient` in production, mocks in tests.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn score(&self, request: ComparisonRequest) -> Result<ComparisonResult, ScoringError>;
}

#[derive(Clone)]
pub struct HttpScoringClient {
    client: Client,
    endpoint: String,
}

impl HttpScoringClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn score(&self, request: ComparisonRequest) -> Result<ComparisonResult, ScoringError> {
        let fields = request.field_names();
        let form = request.into_form()?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScoringError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: CvScoreResponse = serde_json::from_str(&body)?;

        debug!(
            "Scoring call succeeded: fields={:?}, cv_score={}",
            fields, parsed.cv_score
        );

        parsed.into_result()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Multipart, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::comparison::request::SlotPayload;
    use crate::documents::slot::UploadedFile;

    /// Field name → (file name, body) as received by the mock service.
    type Received = Arc<Mutex<BTreeMap<String, (Option<String>, String)>>>;

    /// Spawns a local scoring service that records the multipart fields it sees.
    async fn spawn_mock_service(status: StatusCode, body: Value) -> (String, Received) {
        let received: Received = Arc::default();

        let handler = move |State(received): State<Received>, mut multipart: Multipart| {
            let body = body.clone();
            async move {
                while let Ok(Some(field)) = multipart.next_field().await {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(String::from);
                    let text = field.text().await.unwrap_or_default();
                    received.lock().unwrap().insert(name, (file_name, text));
                }
                (status, Json(body))
            }
        };

        let app = Router::new()
            .route("/compute_cvScore/", post(handler))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/compute_cvScore/"), received)
    }

    fn text_request() -> ComparisonRequest {
        ComparisonRequest {
            cv: SlotPayload::Text("React, Node.js".to_string()),
            jd: SlotPayload::Text("Python, AWS".to_string()),
        }
    }

    #[tokio::test]
    async fn test_text_slots_sent_as_content_fields() {
        let (endpoint, received) = spawn_mock_service(
            StatusCode::OK,
            json!({
                "cv_score": 42,
                "summary": "Frontend heavy profile",
                "matching_keywords": ["React"],
                "missing_keywords": ["Python", "AWS"],
                "success": true
            }),
        )
        .await;

        let result = HttpScoringClient::new(endpoint)
            .score(text_request())
            .await
            .unwrap();

        assert_eq!(result.score, 42.0);
        assert_eq!(result.matched_skills, vec!["React"]);
        assert_eq!(result.missing_skills, vec!["Python", "AWS"]);
        assert_eq!(result.summary_notes, vec!["Frontend heavy profile"]);

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received["cv_content"], (None, "React, Node.js".to_string()));
        assert_eq!(received["jd_content"], (None, "Python, AWS".to_string()));
    }

    #[tokio::test]
    async fn test_file_slot_sent_as_file_field_only() {
        let (endpoint, received) = spawn_mock_service(
            StatusCode::OK,
            json!({
                "cv_score": 5.5,
                "matching_keywords": [],
                "missing_keywords": []
            }),
        )
        .await;

        let request = ComparisonRequest {
            cv: SlotPayload::File(UploadedFile::new("cv.docx", b"Go, Docker".to_vec()).unwrap()),
            jd: SlotPayload::Text("Go".to_string()),
        };
        let result = HttpScoringClient::new(endpoint).score(request).await.unwrap();
        assert!(result.summary_notes.is_empty());

        let received = received.lock().unwrap();
        assert!(!received.contains_key("cv_content"));
        assert_eq!(
            received["cv_file"],
            (Some("cv.docx".to_string()), "Go, Docker".to_string())
        );
        assert!(received.contains_key("jd_content"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (endpoint, _) =
            spawn_mock_service(StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "boom"})).await;

        let err = HttpScoringClient::new(endpoint)
            .score(text_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_enveloped_response_is_malformed() {
        let (endpoint, _) = spawn_mock_service(
            StatusCode::OK,
            json!({
                "success": true,
                "message": "ok",
                "result": {"cv_score": 8, "matching_keywords": [], "missing_keywords": []}
            }),
        )
        .await;

        let err = HttpScoringClient::new(endpoint)
            .score(text_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpScoringClient::new(format!("http://{addr}/compute_cvScore/"))
            .score(text_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::Http(_)));
    }

    #[test]
    fn test_success_false_is_rejected() {
        let response: CvScoreResponse = serde_json::from_value(json!({
            "cv_score": 0,
            "matching_keywords": [],
            "missing_keywords": [],
            "success": false,
            "message": "Could not parse CV"
        }))
        .unwrap();

        match response.into_result() {
            Err(ScoringError::Rejected { message }) => assert_eq!(message, "Could not parse CV"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
