//! OpenAI-backed text and speech providers

use super::provider::{resolve_api_key, SpeechSynthesizer, TextProvider};
use crate::config::OpenAiConfig;
use crate::error::{Error, Result};
use crate::store::Suggestion;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const SUGGESTION_COUNT: usize = 3;

/// Chat-completions client asking for structured travel suggestions
pub struct OpenAiTextProvider {
    config: OpenAiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiTextProvider {
    /// Build from config; the API key comes from the config or the
    /// `OPENAI_API_KEY` environment variable.
    pub fn new(config: OpenAiConfig, timeout: Duration) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, api_key, client })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl TextProvider for OpenAiTextProvider {
    async fn suggestions(&self, place: &str, category: &str) -> Result<Vec<Suggestion>> {
        let prompt = format!(
            "You are a travel guide. Provide {} short {} suggestions for {}. \
             Return a JSON array of objects with keys: name, description, tip.",
            SUGGESTION_COUNT,
            category.to_lowercase(),
            place
        );
        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.7,
            "max_tokens": 500,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| Error::Provider("empty completion response".to_string()))?;

        Ok(parse_suggestions(content))
    }
}

/// Parse the model reply: a JSON array when the model followed the
/// instructions, otherwise one suggestion per non-empty line (first three).
fn parse_suggestions(content: &str) -> Vec<Suggestion> {
    if let Ok(items) = serde_json::from_str::<Vec<Suggestion>>(content) {
        return items;
    }
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(SUGGESTION_COUNT)
        .enumerate()
        .map(|(i, line)| Suggestion {
            name: format!("Suggestion {}", i + 1),
            description: line.to_string(),
            tip: String::new(),
        })
        .collect()
}

/// Text-to-speech via the audio/speech endpoint
pub struct OpenAiSpeech {
    config: OpenAiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiSpeech {
    /// Build from config; key resolution matches [`OpenAiTextProvider`].
    pub fn new(config: OpenAiConfig, timeout: Duration) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, api_key, client })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let body = json!({
            "model": self.config.speech_model,
            "voice": self.config.voice,
            "input": text,
        });

        let response = self
            .client
            .post(format!("{}/audio/speech", self.config.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }
}
