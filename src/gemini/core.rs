use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ai::chat::{AdapterError, ModelClient, ModelSession, ModelSessionHandle, Role, Turn};
use crate::core::AppConfig;

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_hostname: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.gemini_api_hostname,
            &config.gemini_api_key,
            &config.gemini_model,
            config.request_timeout,
        )
    }

    /// Ask the model to continue the conversation in `history` with
    /// `text` and return the trimmed reply.
    pub async fn generate_content(
        &self,
        system_instruction: &str,
        history: &[Turn],
        text: &str,
    ) -> Result<String, AdapterError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_hostname.trim_end_matches('/'),
            self.model
        );
        let payload = GenerateContentRequest::new(system_instruction, history, text);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let parsed = serde_json::from_str::<GenerateContentResponse>(&body).map_err(|e| {
            tracing::error!("Parsing Gemini response failed for {}\nError: {}", body, e);
            AdapterError::MalformedResponse(e.to_string())
        })?;

        extract_text(parsed)
    }

    fn request_error(&self, err: reqwest::Error) -> AdapterError {
        if err.is_timeout() {
            AdapterError::Timeout(self.timeout)
        } else {
            AdapterError::Transport(err.to_string())
        }
    }
}

impl ModelClient for GeminiClient {
    fn create(&self, system_instruction: &str) -> ModelSessionHandle {
        Box::new(GeminiChat {
            client: self.clone(),
            system_instruction: system_instruction.to_string(),
            history: Vec::new(),
        })
    }
}

/// A Gemini conversation. Gemini's API is stateless so the context
/// lives here and is sent in full on every request.
pub struct GeminiChat {
    client: GeminiClient,
    system_instruction: String,
    history: Vec<Turn>,
}

#[async_trait]
impl ModelSession for GeminiChat {
    async fn send(&mut self, text: &str) -> Result<String, AdapterError> {
        let reply = self
            .client
            .generate_content(&self.system_instruction, &self.history, text)
            .await?;
        self.history.push(Turn::user(text));
        self.history.push(Turn::assistant(&reply));
        Ok(reply)
    }

    fn history(&self) -> &[Turn] {
        &self.history
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn new(role: Option<&'a str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

impl<'a> GenerateContentRequest<'a> {
    fn new(system_instruction: &'a str, history: &'a [Turn], text: &'a str) -> Self {
        // Gemini calls the assistant role "model"
        let mut contents: Vec<Content<'a>> = history
            .iter()
            .map(|turn| {
                let role = match turn.role() {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                Content::new(Some(role), turn.text())
            })
            .collect();
        contents.push(Content::new(Some("user"), text));

        Self {
            system_instruction: Content::new(None, system_instruction),
            contents,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

// {"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}
#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, AdapterError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AdapterError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AdapterError::MalformedResponse(
            "No candidates in the response".to_string(),
        ));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();

    if !text.is_empty() {
        return Ok(text.to_string());
    }

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    match finish_reason.as_str() {
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
            Err(AdapterError::Blocked(finish_reason.clone()))
        }
        _ => Err(AdapterError::MalformedResponse(
            "No text in the response candidate".to_string(),
        )),
    }
}

fn map_http_error(status: StatusCode, body: &str) -> AdapterError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let msg = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            })
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdapterError::Authentication {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => AdapterError::Quota(message),
        _ => AdapterError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
