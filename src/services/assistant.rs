use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    services::providers::{CompletionProvider, CompletionRequest},
};

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

/// Answers free-form questions with a single text completion
#[derive(Clone)]
pub struct Assistant {
    provider: Arc<dyn CompletionProvider>,
}

impl Assistant {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub async fn ask(&self, question: &str) -> AppResult<String> {
        if question.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Field 'question' must not be empty".to_string(),
            ));
        }

        let request = CompletionRequest {
            prompt: question.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let answer = self.provider.complete(request).await?;
        Ok(answer.trim().to_string())
    }
}
