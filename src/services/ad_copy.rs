//! Ad-copy generation gateway
//!
//! Memoizing wrapper around an OpenAI-compatible completion provider.
//! Exactly one provider attempt per cache miss; failures degrade to a
//! deterministic fallback that is cached with the same TTL so repeated
//! failures do not repeatedly hit the provider.

use std::time::Instant;

use dashmap::DashMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::AiConfig;
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

struct CachedCopy {
    text: String,
    stored_at: Instant,
}

pub struct AdCopyService {
    client: reqwest::Client,
    cache: DashMap<String, CachedCopy>,
    config: AiConfig,
}

impl AdCopyService {
    pub fn new(config: AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            cache: DashMap::new(),
            config,
        }
    }

    /// Generate ad copy for a prompt. Infallible from the caller's side:
    /// provider errors resolve to a deterministic fallback string.
    pub async fn generate(&self, prompt: &str) -> String {
        let key = cache_key(prompt);

        if let Some(hit) = self.cache.get(&key) {
            if hit.stored_at.elapsed() < self.config.cache_ttl {
                return hit.text.clone();
            }
        }

        let text = match self.config.provider.as_str() {
            "openai" => match self.call_provider(prompt).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("ad-copy provider error: {}", e);
                    format!("Fallback Ad Copy - {}", prompt)
                }
            },
            _ => noop_copy(prompt),
        };

        self.cache.insert(
            key,
            CachedCopy {
                text: text.clone(),
                stored_at: Instant::now(),
            },
        );

        text
    }

    async fn call_provider(&self, prompt: &str) -> Result<String, DomainError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::Upstream("OPENAI_API_KEY not set".to_string()))?;

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "model": self.config.model,
                "messages": [{"role": "user", "content": prompt}],
                "max_tokens": 500
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(DomainError::Upstream(format!(
                "generation provider returned status {}",
                resp.status()
            )));
        }

        let parsed: ChatCompletionResponse = resp.json().await?;
        parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| DomainError::Upstream("empty completion".to_string()))
    }
}

fn cache_key(prompt: &str) -> String {
    hex::encode(Sha256::digest(prompt.as_bytes()))
}

fn noop_copy(prompt: &str) -> String {
    format!(
        "Kaapav Fallback Ad Copy\n\nPrompt:\n{}\n\nSample: Discover timeless jewellery - shop now.",
        prompt
    )
}
