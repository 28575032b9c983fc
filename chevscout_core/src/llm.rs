use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::attachment::CvAttachment;
use crate::error::AdvisorError;
use crate::prompt::{response_schema, ADVISOR_INSTRUCTION};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single network seam of the app: one `generateContent` round-trip per
/// submission. No streaming, no retries, no cancellation; the submit control
/// stays disabled until this returns or fails.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, AdvisorError> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AdvisorError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            model: model.trim().to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the CV and composed user message with the fixed instruction and
    /// the response schema, returning the raw response text. Any transport
    /// failure, non-success status or empty candidate becomes a Service
    /// error whose message is surfaced to the user verbatim.
    pub async fn submit(
        &self,
        attachment: &CvAttachment,
        user_message: &str,
    ) -> Result<String, AdvisorError> {
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);

        let payload = json!({
            "system_instruction": {
                "parts": [{ "text": ADVISOR_INSTRUCTION }]
            },
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": user_message },
                    {
                        "inline_data": {
                            "mime_type": attachment.mime_type,
                            "data": attachment.data
                        }
                    }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        debug!(
            "Submitting to {} (cv {} bytes base64, {})",
            self.model,
            attachment.data.len(),
            attachment.mime_type
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AdvisorError::Service(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AdvisorError::Service(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| truncate_error(&text));
            warn!("Gemini returned {}: {}", status, message);
            return Err(AdvisorError::Service(format!(
                "status {}: {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| AdvisorError::Service(format!("unreadable response envelope: {}", e)))?;

        extract_text(parsed)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, AdvisorError> {
    let candidate = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| AdvisorError::Service("no candidates in response".to_string()))?;

    let chunks: Vec<String> = candidate
        .content
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .filter(|t| !t.trim().is_empty())
        .collect();

    if chunks.is_empty() {
        if let Some(reason) = candidate.finish_reason {
            return Err(AdvisorError::Service(format!(
                "model stopped without output, reason: {}",
                reason
            )));
        }
        return Err(AdvisorError::Service(
            "no text content in response".to_string(),
        ));
    }

    Ok(chunks.join("\n"))
}

fn truncate_error(text: &str) -> String {
    const MAX: usize = 320;
    if text.len() > MAX {
        let cut = text
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &text[..cut])
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(raw: &str) -> GenerateResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn extracts_joined_text_parts() {
        let response = envelope(
            r#"{ "candidates": [ { "content": { "parts": [
                { "text": "{\"notes\":" }, { "text": "[]}" }
            ] } } ] }"#,
        );
        assert_eq!(extract_text(response).unwrap(), "{\"notes\":\n[]}");
    }

    #[test]
    fn empty_candidates_is_a_service_error() {
        let response = envelope(r#"{ "candidates": [] }"#);
        assert!(matches!(
            extract_text(response),
            Err(AdvisorError::Service(_))
        ));
    }

    #[test]
    fn finish_reason_is_surfaced_when_there_is_no_text() {
        let response = envelope(r#"{ "candidates": [ { "finishReason": "SAFETY" } ] }"#);
        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn truncate_keeps_short_errors_verbatim() {
        assert_eq!(truncate_error("quota exceeded"), "quota exceeded");
        let long = "x".repeat(500);
        let out = truncate_error(&long);
        assert!(out.ends_with("..."));
        assert!(out.len() < 400);
    }
}
