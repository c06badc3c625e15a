use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::model::PhraseRecord;
use crate::domain::ports::PhraseSource;
use crate::utils::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const PHRASE_PROMPT: &str = "Generate a short inspirational phrase. \
    Also provide the author of the phrase and the author's primary known location \
    (e.g., city or country of birth, or primary place of work if very well-known). \
    Format the output as a JSON object with three keys: 'phrase', 'author', and 'location'. \
    For example: {\"phrase\": \"The only way to do great work is to love what you do.\", \
    \"author\": \"Steve Jobs\", \"location\": \"San Francisco\"}. \
    If the location is not applicable or widely known for a common phrase/author, \
    use null for location.";

/// Fetches one phrase per call from the Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// One bounded attempt against the API; returns the raw reply text.
    async fn request_text(&self) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: PHRASE_PROMPT.to_string(),
                }],
            }],
        };

        tracing::debug!("Making API request to: {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let reply: GenerateResponse = response.json().await?;

        // 沒有 candidates/parts 視為空回應,不再嘗試解析
        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text)
    }

    fn parse_record(reply: &str) -> Result<PhraseRecord, ProviderError> {
        let data: Value = serde_json::from_str(strip_code_fence(reply))?;

        let phrase = data.get("phrase").and_then(Value::as_str);
        let author = data.get("author").and_then(Value::as_str);

        let mut missing = Vec::new();
        if phrase.is_none() {
            missing.push("phrase");
        }
        if author.is_none() {
            missing.push("author");
        }
        if data.get("location").is_none() {
            missing.push("location");
        }

        match (phrase, author) {
            (Some(phrase), Some(author)) if missing.is_empty() => Ok(PhraseRecord {
                phrase: phrase.to_string(),
                author: author.to_string(),
                // null 直接轉成 None,原樣帶過
                location: data
                    .get("location")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            _ => Err(ProviderError::IncompleteResponse { missing }),
        }
    }
}

#[async_trait]
impl PhraseSource for GeminiProvider {
    async fn fetch(&self) -> Result<PhraseRecord, ProviderError> {
        let reply = self.request_text().await?;
        tracing::debug!("Generation API reply text: {}", reply);
        Self::parse_record(&reply)
    }
}

/// Gemini often wraps the requested JSON object in a markdown code fence;
/// strip it before parsing so a fenced but valid object still succeeds.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_record_passes_location_through() {
        let record = GeminiProvider::parse_record(
            r#"{"phrase": "Keep going.", "author": "Anonymous", "location": "Paris"}"#,
        )
        .unwrap();

        assert_eq!(record.phrase, "Keep going.");
        assert_eq!(record.author, "Anonymous");
        assert_eq!(record.location.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_parse_record_null_location_becomes_none() {
        let record = GeminiProvider::parse_record(
            r#"{"phrase": "Keep going.", "author": "Anonymous", "location": null}"#,
        )
        .unwrap();

        assert_eq!(record.location, None);
    }

    #[test]
    fn test_parse_record_rejects_non_json() {
        let err = GeminiProvider::parse_record("here is your phrase!").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_record_names_missing_keys() {
        let err = GeminiProvider::parse_record(r#"{"phrase": "Keep going."}"#).unwrap_err();
        match err {
            ProviderError::IncompleteResponse { missing } => {
                assert_eq!(missing, vec!["author", "location"]);
            }
            other => panic!("expected incomplete response, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_record_fenced_json_still_parses() {
        let record = GeminiProvider::parse_record(
            "```json\n{\"phrase\": \"Keep going.\", \"author\": \"Anonymous\", \"location\": null}\n```",
        )
        .unwrap();

        assert_eq!(record.phrase, "Keep going.");
    }
}
