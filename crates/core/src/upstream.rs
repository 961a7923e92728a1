//! Client for the upstream generative-language API.
//!
//! [`GenerativeModel`] is the seam the triage service talks to. [`GeminiClient`] implements it
//! against Gemini's `generateContent` endpoint; tests substitute their own implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::UpstreamConfig;
use crate::{TriageError, TriageResult};

/// A text-generation backend that turns one prompt into a candidate response.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send `prompt` upstream in a single attempt.
    async fn generate(&self, prompt: &str) -> TriageResult<GenerateContentResponse>;
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(text: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [RequestPart { text }],
            }],
        }
    }
}

/// Response body from `generateContent`. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// A response holding a single candidate with a single text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
            }],
        }
    }

    /// Text of the first part of the first candidate, the only piece of the payload used.
    pub fn first_candidate_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// Gemini HTTP client.
///
/// The API key travels as the `key` query parameter, so reqwest errors are stripped of their
/// URL before they are logged or returned.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from startup configuration.
    ///
    /// # Errors
    /// Returns [`TriageError::HttpClient`] if the underlying reqwest client cannot be built.
    pub fn new(api_key: impl Into<String>, cfg: &UpstreamConfig) -> TriageResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TriageError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                cfg.base_url().trim_end_matches('/'),
                cfg.model()
            ),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> TriageResult<GenerateContentResponse> {
        let body = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let timed_out = e.is_timeout();
                let e = e.without_url();
                if timed_out {
                    TriageError::UpstreamTransport(format!("request timed out: {e}"))
                } else {
                    TriageError::UpstreamTransport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| TriageError::MalformedPayload(e.without_url().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use std::collections::HashMap;

    #[test]
    fn first_candidate_text_reads_nested_parts() {
        let payload = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "(PRIORIDAD III) Dolor abdominal"}, {"text": "extra"}]}},
                {"content": {"parts": [{"text": "segundo"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(
            parsed.first_candidate_text(),
            Some("(PRIORIDAD III) Dolor abdominal")
        );
    }

    #[test]
    fn missing_fields_give_no_candidate_text() {
        for payload in [
            r#"{}"#,
            r#"{"candidates": []}"#,
            r#"{"candidates": [{}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{}]}}]}"#,
        ] {
            let parsed: GenerateContentResponse = serde_json::from_str(payload).unwrap();
            assert_eq!(parsed.first_candidate_text(), None, "payload: {payload}");
        }
    }

    #[test]
    fn request_body_wraps_prompt_in_contents_parts() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("hola")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"parts": [{"text": "hola"}]}]})
        );
    }

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let cfg = UpstreamConfig::new("https://example.test/v1beta/", "gemini-pro", None).unwrap();
        let client = GeminiClient::new("k", &cfg).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn generate_posts_prompt_with_key_query() {
        async fn handler(
            Path(model): Path<String>,
            Query(query): Query<HashMap<String, String>>,
            Json(body): Json<serde_json::Value>,
        ) -> Json<GenerateContentResponse> {
            let echoed = format!(
                "{model}|{}|{}",
                query.get("key").cloned().unwrap_or_default(),
                body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default()
            );
            Json(GenerateContentResponse::from_text(echoed))
        }

        let base = spawn_upstream(Router::new().route("/models/:model", post(handler))).await;
        let cfg = UpstreamConfig::new(base, "gemini-pro", None).unwrap();
        let client = GeminiClient::new("secret-key", &cfg).unwrap();

        let response = client.generate("dolor").await.unwrap();
        assert_eq!(
            response.first_candidate_text(),
            Some("gemini-pro:generateContent|secret-key|dolor")
        );
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_status_error() {
        let app = Router::new().route(
            "/models/:model",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_upstream(app).await;
        let cfg = UpstreamConfig::new(base, "gemini-pro", None).unwrap();
        let client = GeminiClient::new("k", &cfg).unwrap();

        match client.generate("x").await {
            Err(TriageError::UpstreamStatus { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed_payload() {
        let app = Router::new().route("/models/:model", post(|| async { "not json" }));
        let base = spawn_upstream(app).await;
        let cfg = UpstreamConfig::new(base, "gemini-pro", None).unwrap();
        let client = GeminiClient::new("k", &cfg).unwrap();

        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, TriageError::MalformedPayload(_)), "{err:?}");
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_api_key() {
        // Nothing listens on port 9 of the loopback address.
        let cfg = UpstreamConfig::new("http://127.0.0.1:9", "gemini-pro", None).unwrap();
        let client = GeminiClient::new("super-secret", &cfg).unwrap();

        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, TriageError::UpstreamTransport(_)), "{err:?}");
        assert!(!err.to_string().contains("super-secret"));
    }
}
