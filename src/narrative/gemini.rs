//! Gemini `generateContent` integration.
//!
//! One blocking POST per request, no retries. The response text is returned
//! as-is; only the envelope (`candidates[0].content.parts[*].text`) is parsed.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{NarrativeError, NarrativeGenerator, build_prompt};
use crate::config::NarrativeConfig;
use crate::domain::PropertyFeatures;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client, resolving the API key from the process environment.
    ///
    /// `.env` in the working directory is loaded first. Fails with
    /// [`NarrativeError::MissingCredential`] when the variable is unset or blank.
    pub fn from_env(config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Build a client, resolving the API key through `lookup`.
    pub fn from_lookup<F>(config: &NarrativeConfig, lookup: F) -> Result<Self, NarrativeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = resolve_api_key(&config.api_key_env, lookup)?;
        Self::new(config, api_key)
    }

    pub fn new(config: &NarrativeConfig, api_key: SecretString) -> Result<Self, NarrativeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NarrativeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send `prompt` and return the completion text.
    pub fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        };

        info!(model = %self.model, prompt_chars = prompt.chars().count(), "requesting market analysis");

        let resp = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&request)
            .send()
            .map_err(|e| NarrativeError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| NarrativeError::Network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let text = extract_text(&body)?;
        debug!(response_chars = text.chars().count(), "market analysis received");
        Ok(text)
    }
}

impl NarrativeGenerator for GeminiClient {
    fn explain(&self, point_estimate: u64, features: &PropertyFeatures) -> Result<String, NarrativeError> {
        self.generate(&build_prompt(point_estimate, features))
    }
}

/// Resolve the API key named `var` through `lookup`.
pub fn resolve_api_key<F>(var: &str, lookup: F) -> Result<SecretString, NarrativeError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(key) if !key.trim().is_empty() => Ok(SecretString::from(key.trim().to_string())),
        _ => Err(NarrativeError::MissingCredential { var: var.to_string() }),
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl ErrorDetail {
    fn has_reason(&self, reason: &str) -> bool {
        self.details
            .iter()
            .any(|d| d.get("reason").and_then(|r| r.as_str()) == Some(reason))
    }
}

fn extract_text(body: &str) -> Result<String, NarrativeError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| NarrativeError::MalformedResponse(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(NarrativeError::EmptyResponse);
    }
    Ok(text)
}

fn classify_failure(status: StatusCode, body: &str) -> NarrativeError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = match &detail {
        Some(d) if !d.message.is_empty() => d.message.clone(),
        _ => body.trim().to_string(),
    };
    let key_invalid = detail.as_ref().is_some_and(|d| d.has_reason("API_KEY_INVALID"));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NarrativeError::CredentialRejected {
            status: status.as_u16(),
            message,
        },
        StatusCode::BAD_REQUEST if key_invalid => NarrativeError::CredentialRejected {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => NarrativeError::QuotaExhausted { message },
        _ => NarrativeError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer) -> NarrativeConfig {
        NarrativeConfig {
            model: "gemini-test".to_string(),
            base_url: server.base_url(),
            timeout_secs: 5,
            api_key_env: "TEST_KEY".to_string(),
        }
    }

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&config_for(server), SecretString::from("secret-key".to_string())).unwrap()
    }

    #[test]
    fn explain_posts_prompt_and_joins_parts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent")
                .header("x-goog-api-key", "secret-key")
                .body_contains("$1,663,200")
                .body_contains("98103");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Solid " }, { "text": "valuation." }] }
                }]
            }));
        });

        let text = client_for(&server)
            .explain(1_663_200, &PropertyFeatures::default())
            .unwrap();

        mock.assert();
        assert_eq!(text, "Solid valuation.");
    }

    #[test]
    fn multibyte_text_passes_through_untouched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).body_contains("Café");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Prix réaliste, 3½ salles de bain." }] } }]
            }));
        });

        let text = client_for(&server).generate("Café près du lac").unwrap();
        assert_eq!(text, "Prix réaliste, 3½ salles de bain.");
    }

    #[test]
    fn key_lookup_builds_the_client_or_reports_the_variable() {
        let server = MockServer::start();
        let config = config_for(&server);

        let client = GeminiClient::from_lookup(&config, |name| (name == "TEST_KEY").then(|| "k".to_string())).unwrap();
        assert_eq!(client.model(), "gemini-test");

        let err = GeminiClient::from_lookup(&config, |_| None).unwrap_err();
        assert_eq!(err, NarrativeError::MissingCredential { var: "TEST_KEY".to_string() });
    }

    #[test]
    fn unauthorized_maps_to_credential_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(403)
                .json_body(json!({ "error": { "code": 403, "message": "Permission denied" } }));
        });

        let err = client_for(&server).generate("hi").unwrap_err();
        assert_eq!(
            err,
            NarrativeError::CredentialRejected { status: 403, message: "Permission denied".to_string() }
        );
    }

    #[test]
    fn invalid_key_reason_on_bad_request_is_a_rejection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(400).json_body(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid.",
                    "details": [{ "reason": "API_KEY_INVALID" }]
                }
            }));
        });

        let err = client_for(&server).generate("hi").unwrap_err();
        assert!(matches!(err, NarrativeError::CredentialRejected { status: 400, .. }));
    }

    #[test]
    fn rate_limit_maps_to_quota_exhausted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(429).body("slow down");
        });

        let err = client_for(&server).generate("hi").unwrap_err();
        assert_eq!(err, NarrativeError::QuotaExhausted { message: "slow down".to_string() });
    }

    #[test]
    fn server_error_keeps_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(503).json_body(json!({ "error": { "message": "overloaded" } }));
        });

        let err = client_for(&server).generate("hi").unwrap_err();
        assert_eq!(err, NarrativeError::Api { status: 503, message: "overloaded".to_string() });
    }

    #[test]
    fn non_json_success_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).body("<html>oops</html>");
        });

        let err = client_for(&server).generate("hi").unwrap_err();
        assert!(matches!(err, NarrativeError::MalformedResponse(_)));
    }

    #[test]
    fn missing_or_blank_text_is_empty() {
        assert_eq!(extract_text(r#"{"candidates": []}"#), Err(NarrativeError::EmptyResponse));
        assert_eq!(
            extract_text(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#),
            Err(NarrativeError::EmptyResponse)
        );
        assert_eq!(extract_text(r#"{"promptFeedback": {}}"#), Err(NarrativeError::EmptyResponse));
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        let config = NarrativeConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..NarrativeConfig::default()
        };
        let client = GeminiClient::new(&config, SecretString::from("k".to_string())).unwrap();
        assert!(matches!(client.generate("hi"), Err(NarrativeError::Network(_))));
    }

    #[test]
    fn api_key_resolution() {
        let err = resolve_api_key("GOOGLE_API_KEY", |_| None).unwrap_err();
        assert_eq!(err, NarrativeError::MissingCredential { var: "GOOGLE_API_KEY".to_string() });

        assert!(resolve_api_key("GOOGLE_API_KEY", |_| Some("   ".to_string())).is_err());

        let key = resolve_api_key("GOOGLE_API_KEY", |_| Some(" abc \n".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "abc");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let server = MockServer::start();
        let rendered = format!("{:?}", client_for(&server));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("gemini-test"));
    }
}
