use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::OracleConfig;
use crate::error::{OracleError, QueryError};

/// One interpretation request.
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
    pub user_text: &'a str,
    pub system_instruction: &'a str,
    pub credentials: &'a str,
}

/// The natural-language interpretation capability.
///
/// Implementations return the service's raw text. The text is untrusted: callers run it
/// through [`parse_payload`] and the validator before acting on it.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn interpret(&self, request: OracleRequest<'_>) -> Result<String, OracleError>;
}

/// Strip markdown code fences (with or without a `json` info string) and surrounding
/// whitespace.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest;
        if body.get(..4).is_some_and(|info| info.eq_ignore_ascii_case("json")) {
            body = &body[4..];
        }
    }
    body = body.trim();
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parses oracle text into a JSON value, tolerating fences and whitespace.
pub fn parse_payload(text: &str) -> Result<Value, QueryError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(QueryError::OracleMalformedResponse("empty response".to_string()));
    }
    serde_json::from_str(body).map_err(|e| QueryError::OracleMalformedResponse(e.to_string()))
}

// =============================================================================
// Generative Language API
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Oracle backed by the Generative Language `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiOracle {
    http: reqwest::Client,
    config: OracleConfig,
}

impl GeminiOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn headers(credentials: &str) -> Result<HeaderMap, OracleError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(credentials).map_err(|_| OracleError::InvalidCredentials)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl Oracle for GeminiOracle {
    async fn interpret(&self, request: OracleRequest<'_>) -> Result<String, OracleError> {
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![TextPart {
                    text: request.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart {
                    text: request.user_text,
                }],
            }],
            generation_config: self
                .config
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        };

        let url = self.config.generate_url();
        debug!(model = %self.config.model, "oracle request");

        let response = self
            .http
            .post(&url)
            .headers(Self::headers(request.credentials)?)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(OracleError::EmptyResponse),
        }
    }
}
