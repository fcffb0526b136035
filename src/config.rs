use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    /// Unset selects the in-memory store
    pub database_url: Option<String>,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub fulfillment_webhook_url: Option<String>,
    pub reply_delay: Duration,
    pub ai: AiConfig,
}

#[derive(Clone)]
pub struct AiConfig {
    /// "openai" or "noop"
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            fulfillment_webhook_url: env::var("FULFILLMENT_WEBHOOK_URL").ok(),
            reply_delay: Duration::from_millis(
                env::var("REPLY_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2000),
            ),
            ai: AiConfig::from_env(),
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        Self {
            provider: env::var("AI_PROVIDER")
                .unwrap_or_else(|_| "noop".to_string())
                .to_lowercase(),
            api_key: env::var("OPENAI_API_KEY").ok(),
            base_url: env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            cache_ttl: Duration::from_secs(
                env::var("AI_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60 * 60 * 24),
            ),
        }
    }
}
