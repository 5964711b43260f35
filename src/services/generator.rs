use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::AppResult,
    services::providers::{ChatRequest, CompletionProvider},
};

const SYSTEM_PROMPT: &str = "You are an expert movie recommendation assistant.";
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.7;

/// `"3. "` at the start of a line
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\. ").expect("valid regex"));

/// A parenthesised number at the end of a line, e.g. `"(2)"` or `"(2009)"`
static TRAILING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)\)\s*$").expect("valid regex"));

/// Asks the completion service for recommendations and parses the reply into titles
#[derive(Clone)]
pub struct RecommendationGenerator {
    provider: Arc<dyn CompletionProvider>,
}

impl RecommendationGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Returns candidate titles best-first. Upstream failures are returned as errors.
    pub async fn generate(&self, prompt: String) -> AppResult<Vec<String>> {
        let request = ChatRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: prompt,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let content = self.provider.chat(request).await.map_err(|e| {
            tracing::error!(error = %e, "Error fetching recommendations");
            e
        })?;

        let titles = parse_titles(&content);
        tracing::info!(count = titles.len(), titles = ?titles, "Parsed recommendations");

        Ok(titles)
    }
}

/// Parses a numbered-list reply into titles.
///
/// Steps, in order (reordering changes the output):
/// 1. remove every `"`
/// 2. remove every `*`
/// 3. strip a leading `"<n>. "` list marker from each line
/// 4. strip a trailing `"(<n>)"` annotation unless `<n>` has four digits; release
///    years survive so title lookup can drop them separately
/// 5. trim trailing whitespace on each line
/// 6. split into lines and drop the empty ones
pub fn parse_titles(raw: &str) -> Vec<String> {
    let text = raw.replace('"', "").replace('*', "");

    text.lines()
        .map(|line| LIST_MARKER.replace(line, "").into_owned())
        .map(|line| strip_trailing_annotation(&line).to_string())
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn strip_trailing_annotation(line: &str) -> &str {
    match TRAILING_NUMBER.captures(line) {
        Some(caps) if caps[1].len() != 4 => caps.get(0).map_or(line, |m| &line[..m.start()]),
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockCompletionProvider;

    #[test]
    fn test_parse_numbered_list() {
        let raw = "1. The Matrix\n2. Up (2009)\n3. \"Her\"\n";
        assert_eq!(parse_titles(raw), vec!["The Matrix", "Up (2009)", "Her"]);
    }

    #[test]
    fn test_parse_strips_markdown_emphasis() {
        let raw = "1. **Inception**\n2. *Arrival*";
        assert_eq!(parse_titles(raw), vec!["Inception", "Arrival"]);
    }

    #[test]
    fn test_parse_drops_blank_lines_and_trailing_whitespace() {
        let raw = "\n1. Amelie   \n\n\n2. Paddington 2\r\n   \n";
        assert_eq!(parse_titles(raw), vec!["Amelie", "Paddington 2"]);
    }

    #[test]
    fn test_parse_strips_counter_annotations_but_keeps_years() {
        let raw = "1. Heat (1)\n2. Alien (1979)\n3. Rocky (12) ";
        assert_eq!(parse_titles(raw), vec!["Heat", "Alien (1979)", "Rocky"]);
    }

    #[test]
    fn test_parse_only_strips_marker_at_line_start() {
        let raw = "1. 2001: A Space Odyssey\n10. Apollo 13\nSe7en 2. Return";
        assert_eq!(
            parse_titles(raw),
            vec!["2001: A Space Odyssey", "Apollo 13", "Se7en 2. Return"]
        );
    }

    #[test]
    fn test_parse_quotes_removed_before_marker() {
        // Quote removal runs first, so a quoted marker still gets stripped.
        assert_eq!(parse_titles("\"1. Up\""), vec!["Up"]);
    }

    #[tokio::test]
    async fn test_generate_sends_fixed_system_role() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_chat()
            .withf(|request| {
                request.system == SYSTEM_PROMPT
                    && request.user == "my prompt"
                    && request.max_tokens == 200
                    && (request.temperature - 0.7).abs() < f32::EPSILON
            })
            .times(1)
            .returning(|_| Ok("1. Up\n2. Heat".to_string()));

        let generator = RecommendationGenerator::new(Arc::new(provider));
        let titles = generator.generate("my prompt".to_string()).await.unwrap();
        assert_eq!(titles, vec!["Up", "Heat"]);
    }

    #[tokio::test]
    async fn test_generate_propagates_upstream_error() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_chat()
            .returning(|_| Err(AppError::ExternalApi("OpenAI API returned status 429".to_string())));

        let generator = RecommendationGenerator::new(Arc::new(provider));
        let result = generator.generate("prompt".to_string()).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
