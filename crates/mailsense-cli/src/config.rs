//! Environment-based configuration.
//!
//! The LLM API key is the only hard requirement: without it the service
//! cannot do anything and startup fails.  Gmail credentials may be absent;
//! mail operations then fail lazily with the authentication category.

use anyhow::{Result, bail};

use mailsense_agent::LlmConfig;
use mailsense_mail::GmailCredentials;
use mailsense_web::WebConfig;

/// Default model, matching the hosted provider the service was built for.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Gemini's OpenAI-compatible endpoint, the default base URL.
const GEMINI_OPENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Everything the binary needs to wire the service together.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider settings.
    pub llm: LlmConfig,
    /// Gmail OAuth2 credentials (possibly unset).
    pub gmail: GmailCredentials,
    /// HTTP bind settings.
    pub web: WebConfig,
}

impl Config {
    /// Load the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load the configuration from an arbitrary variable source.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| get(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let Some(api_key) = var("LLM_API_KEY") else {
            bail!("LLM_API_KEY is not set; the assistant cannot start without it");
        };

        let model = var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let temperature = match var("LLM_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .map_err(|_| anyhow::anyhow!("LLM_TEMPERATURE must be a number, got `{raw}`"))?,
            None => DEFAULT_TEMPERATURE,
        };

        let provider = var("LLM_PROVIDER").unwrap_or_else(|| "openai".to_owned());
        let llm = match provider.as_str() {
            "anthropic" => LlmConfig::anthropic(api_key, model),
            "openai" => {
                let base_url =
                    var("LLM_BASE_URL").unwrap_or_else(|| GEMINI_OPENAI_BASE_URL.to_owned());
                LlmConfig::openai_compatible(api_key, model, base_url)
            }
            other => bail!("unsupported LLM_PROVIDER `{other}` (expected `openai` or `anthropic`)"),
        }
        .with_temperature(temperature);

        let gmail = GmailCredentials::new(
            var("GMAIL_CLIENT_ID").unwrap_or_default(),
            var("GMAIL_CLIENT_SECRET").unwrap_or_default(),
            var("GMAIL_REFRESH_TOKEN").unwrap_or_default(),
        );

        let defaults = WebConfig::default();
        let web = WebConfig {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: match var("PORT") {
                Some(raw) => raw
                    .parse::<u16>()
                    .map_err(|_| anyhow::anyhow!("PORT must be a number, got `{raw}`"))?,
                None => defaults.port,
            },
        };

        Ok(Self { llm, gmail, web })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsense_agent::LlmProvider;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_llm_key_is_fatal() {
        let err = Config::from_vars(source(&[])).unwrap_err();
        assert!(err.to_string().contains("LLM_API_KEY"));
    }

    #[test]
    fn defaults_fill_everything_but_the_key() {
        let config = Config::from_vars(source(&[("LLM_API_KEY", "key-123")])).unwrap();

        assert_eq!(config.llm.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.temperature, Some(0.7));
        assert!(config.llm.base_url.contains("generativelanguage"));
        assert!(!config.gmail.is_configured());
        assert_eq!(config.web.port, 8082);
    }

    #[test]
    fn anthropic_provider_is_selectable() {
        let config = Config::from_vars(source(&[
            ("LLM_API_KEY", "key-123"),
            ("LLM_PROVIDER", "anthropic"),
            ("LLM_MODEL", "claude-sonnet-4-20250514"),
        ]))
        .unwrap();

        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.model, "claude-sonnet-4-20250514");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = Config::from_vars(source(&[
            ("LLM_API_KEY", "key-123"),
            ("LLM_PROVIDER", "mystery"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LLM_PROVIDER"));
    }

    #[test]
    fn gmail_credentials_flow_through() {
        let config = Config::from_vars(source(&[
            ("LLM_API_KEY", "key-123"),
            ("GMAIL_CLIENT_ID", "cid"),
            ("GMAIL_CLIENT_SECRET", "sec"),
            ("GMAIL_REFRESH_TOKEN", "tok"),
            ("PORT", "9000"),
        ]))
        .unwrap();

        assert!(config.gmail.is_configured());
        assert_eq!(config.web.port, 9000);
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = Config::from_vars(source(&[
            ("LLM_API_KEY", "key-123"),
            ("LLM_TEMPERATURE", "warm"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LLM_TEMPERATURE"));
    }
}
