use std::env;
use std::time::Duration;

use crate::utils::retry::RetryPolicy;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRANSCRIPT_LANGUAGE: &str = "en";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: Option<String>,
    pub youtube_api_key: String,
    pub transcript_language: String,
    pub model_timeout: Duration,
    pub lookup_timeout: Duration,
    pub upstream_max_retries: usize,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY")
                .map_err(|e| format!("OPENAI_API_KEY: {}", e))?,
            openai_org_id: env::var("OPENAI_ORG_ID").ok(),
            openai_model: env::var("OPENAI_MODEL").ok(),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            youtube_api_key: env::var("YOUTUBE_API_KEY")
                .map_err(|e| format!("YOUTUBE_API_KEY: {}", e))?,
            transcript_language: env::var("TRANSCRIPT_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_TRANSCRIPT_LANGUAGE.to_string()),
            model_timeout: secs_from_env("MODEL_TIMEOUT_SECS", DEFAULT_MODEL_TIMEOUT_SECS)?,
            lookup_timeout: secs_from_env("LOOKUP_TIMEOUT_SECS", DEFAULT_LOOKUP_TIMEOUT_SECS)?,
            upstream_max_retries: parse_var("UPSTREAM_MAX_RETRIES", 0)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.openai_base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.upstream_max_retries)
    }
}

fn secs_from_env(name: &str, default: u64) -> Result<Duration, String> {
    let secs = parse_var(name, default)?;
    if secs == 0 {
        return Err(format!("{}: must be greater than zero", name));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
