/// OpenAI REST client for chat and legacy text completions
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    services::providers::{
        build_http_client, ensure_success, ChatRequest, CompletionProvider, CompletionRequest,
    },
};

const API_NAME: &str = "OpenAI";

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    chat_model: String,
    completion_model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct TextCompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextCompletionResponse {
    choices: Vec<TextChoice>,
}

#[derive(Debug, Deserialize)]
struct TextChoice {
    text: String,
}

impl OpenAiProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        chat_model: String,
        completion_model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            api_key,
            api_url,
            chat_model,
            completion_model,
        })
    }

    async fn post<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<R> {
        let url = format!("{}/{}", self.api_url, path);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let response = ensure_success(API_NAME, response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn chat(&self, request: ChatRequest) -> AppResult<String> {
        let body = ChatCompletionBody {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response: ChatCompletionResponse = self.post("chat/completions", &body).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalApi("Chat completion returned no content".to_string()))
    }

    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let body = TextCompletionBody {
            model: &self.completion_model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response: TextCompletionResponse = self.post("completions", &body).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| AppError::ExternalApi("Completion returned no choices".to_string()))
    }
}
