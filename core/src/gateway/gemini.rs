use crate::prelude::{GatewayError, ModelGateway, ModelRequest};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Connection settings for the generateContent endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// No timeout is applied unless set.
    pub timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

impl GatewayConfig {
    /// Defaults with the API key taken from the environment.
    pub fn from_env() -> Self {
        Self::default().with_env_key()
    }

    /// Fills a missing API key from the first populated key variable.
    pub fn with_env_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = API_KEY_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        }
        self
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<OutboundPart<'a>>,
}

#[derive(Debug, Serialize)]
struct OutboundPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<InboundPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InboundPart {
    text: Option<String>,
}

/// Outbound generateContent body for `request`.
fn request_body(request: &ModelRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![OutboundPart {
                text: &request.prompt,
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.schema,
        },
    }
}

/// Pulls the text payload out of a generateContent response envelope.
///
/// Text parts of the first candidate are concatenated; no text yields `None`.
pub fn extract_text(envelope: &str) -> Result<Option<String>, GatewayError> {
    let response: GenerateContentResponse =
        serde_json::from_str(envelope).map_err(|e| GatewayError::Envelope(e.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Pulls `error.message` out of an error body, falling back to the raw text.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// `ModelGateway` backed by the Gemini REST API. One call per `send`, no retries.
pub struct GeminiGateway {
    config: GatewayConfig,
    client: Client,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        if config.api_key.is_none() {
            warn!(
                "no API key configured (set one of {:?}); requests will be rejected",
                API_KEY_VARS
            );
        }
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn send(&self, request: &ModelRequest) -> Result<Option<String>, GatewayError> {
        let url = self.config.generate_url();
        debug!("POST {} ({:?}, {} prompt bytes)", url, request.kind, request.prompt.len());

        let mut builder = self.client.post(&url).json(&request_body(request));
        if let Some(key) = &self.config.api_key {
            builder = builder.header("x-goog-api-key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        extract_text(&body)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::build_analysis_request;

    #[test]
    fn url_joins_endpoint_and_model() {
        let config = GatewayConfig {
            endpoint: "http://localhost:8080/v1beta/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn body_carries_prompt_mime_type_and_schema() {
        let request = build_analysis_request("spa", "Circuit de Spa-Francorchamps").unwrap();
        let body = serde_json::to_value(request_body(&request)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], request.prompt.as_str());
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], request.schema);
    }

    #[test]
    fn extract_text_concatenates_first_candidate_parts() {
        let envelope = r#"{"candidates":[
            {"content":{"parts":[{"text":"{\"ranking\":"},{"text":"[]}"}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        assert_eq!(
            extract_text(envelope).unwrap().as_deref(),
            Some(r#"{"ranking":[]}"#)
        );
    }

    #[test]
    fn extract_text_without_candidates_is_none() {
        assert_eq!(extract_text("{}").unwrap(), None);
        assert_eq!(
            extract_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn extract_text_rejects_non_json_envelope() {
        assert!(matches!(
            extract_text("<html>bad gateway</html>"),
            Err(GatewayError::Envelope(_))
        ));
    }

    #[test]
    fn upstream_message_prefers_error_field() {
        assert_eq!(
            upstream_message(r#"{"error":{"code":403,"message":"API key not valid"}}"#),
            "API key not valid"
        );
        assert_eq!(upstream_message(" quota exceeded \n"), "quota exceeded");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let gateway = GeminiGateway::new(GatewayConfig {
            endpoint: "http://127.0.0.1:9".into(),
            api_key: Some("test".into()),
            timeout_secs: Some(5),
            ..Default::default()
        })
        .unwrap();
        let request = build_analysis_request("spa", "Circuit de Spa-Francorchamps").unwrap();
        let err = gateway.send(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
