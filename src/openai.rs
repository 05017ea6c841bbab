use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::models::ChatMessage;

/// Backend call failures the orchestrator must tell apart: a rate-limit
/// becomes a dedicated client-facing error, anything else is recoverable
/// through the fallback responder.
#[derive(Debug)]
pub enum GenerationError {
    RateLimited,
    Failed(String),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::RateLimited => write!(f, "generation backend rate limited (429)"),
            GenerationError::Failed(detail) => write!(f, "generation backend failed: {detail}"),
        }
    }
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// One chat-completion round trip, no retries.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, GenerationError> {
        #[derive(Serialize)]
        struct CompletionReq<'a> {
            model: &'a str,
            temperature: f32,
            messages: &'a [ChatMessage],
        }

        #[derive(Deserialize)]
        struct CompletionResp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.api_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&CompletionReq {
                model: &self.model,
                temperature: 0.3,
                messages,
            })
            .send()
            .await
            .map_err(|err| GenerationError::Failed(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Failed(format!(
                "status {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed = response
            .json::<CompletionResp>()
            .await
            .map_err(|err| GenerationError::Failed(err.to_string()))?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if answer.is_empty() {
            return Err(GenerationError::Failed(
                "backend returned an empty completion".to_string(),
            ));
        }

        Ok(answer)
    }
}
