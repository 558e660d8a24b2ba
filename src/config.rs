//! Runtime configuration.
//!
//! All knobs have production-friendly defaults and can be overridden through
//! environment variables. Nothing is read from files.

use crate::{Error, ErrorContext, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const SYSTEM_PROMPT: &str = "You are JASS GPT, a helpful and friendly AI assistant. \
Be conversational, informative, and concise. Respond as if you are having a natural conversation.";

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn parse_base_url(raw: &str, key: &str) -> Result<Url> {
    Url::parse(raw.trim_end_matches('/')).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid URL '{}'", raw),
            ErrorContext::new()
                .with_field_path(key)
                .with_details(e.to_string()),
        )
    })
}

/// Widget-side settings: where the proxy lives and whether to use it at all.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// When false every message goes straight to the fallback responder.
    pub use_api: bool,
    pub backend_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(backend_url: &str) -> Result<Self> {
        Ok(Self {
            use_api: true,
            backend_url: parse_base_url(backend_url, "backend_url")?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Reads `JASS_USE_API`, `JASS_BACKEND_URL` and `JASS_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let raw_url = env::var("JASS_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let timeout_secs = env_parse::<u64>("JASS_HTTP_TIMEOUT_SECS")
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            use_api: env_parse::<bool>("JASS_USE_API").unwrap_or(true),
            backend_url: parse_base_url(&raw_url, "JASS_BACKEND_URL")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_use_api(mut self, use_api: bool) -> Self {
        self.use_api = use_api;
        self
    }

    /// Zero is clamped to one second; the remote call must always be bounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_secs(1));
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url.as_str().trim_end_matches('/'), path)
    }
}

/// Sampling parameters forwarded to the upstream completion API.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 200,
            temperature: 0.7,
            frequency_penalty: 0.5,
            presence_penalty: 0.3,
        }
    }
}

/// Proxy-side settings.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub api_key: Option<String>,
    pub upstream_base_url: Url,
    pub upstream_timeout: Duration,
    pub system_prompt: String,
    pub parameters: ModelParameters,
    pub static_dir: String,
}

impl ProxyConfig {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            port: 3000,
            api_key,
            upstream_base_url: parse_base_url(DEFAULT_UPSTREAM_BASE_URL, "upstream_base_url")?,
            upstream_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            system_prompt: SYSTEM_PROMPT.to_string(),
            parameters: ModelParameters::default(),
            static_dir: "public".to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let defaults = ModelParameters::default();
        let api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let base = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string());

        Ok(Self {
            port: env_parse("PORT").unwrap_or(3000),
            api_key,
            upstream_base_url: parse_base_url(&base, "OPENAI_BASE_URL")?,
            upstream_timeout: Duration::from_secs(
                env_parse::<u64>("JASS_UPSTREAM_TIMEOUT_SECS")
                    .filter(|s| *s > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            system_prompt: env::var("JASS_SYSTEM_PROMPT").unwrap_or_else(|_| SYSTEM_PROMPT.to_string()),
            parameters: ModelParameters {
                model: env::var("JASS_MODEL").unwrap_or(defaults.model),
                max_tokens: env_parse("JASS_MAX_TOKENS").unwrap_or(defaults.max_tokens),
                temperature: env_parse("JASS_TEMPERATURE").unwrap_or(defaults.temperature),
                frequency_penalty: env_parse("JASS_FREQUENCY_PENALTY")
                    .unwrap_or(defaults.frequency_penalty),
                presence_penalty: env_parse("JASS_PRESENCE_PENALTY")
                    .unwrap_or(defaults.presence_penalty),
            },
            static_dir: env::var("JASS_STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
        })
    }

    pub fn with_upstream_base_url(mut self, url: &str) -> Result<Self> {
        self.upstream_base_url = parse_base_url(url, "upstream_base_url")?;
        Ok(self)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// The binary refuses to start without a key.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::configuration_with_context(
                "OPENAI_API_KEY not found",
                ErrorContext::new()
                    .with_field_path("env.OPENAI_API_KEY")
                    .with_source("proxy_config"),
            )
        })
    }

    pub fn upstream_endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.upstream_base_url.as_str().trim_end_matches('/'),
            path
        )
    }
}
