//! Binary configuration read from the environment.

use std::env;

use anthropic_api::{AnthropicApiConfig, AnthropicApiError};

pub const DEFAULT_FAST_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";

/// Model ids per call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Models {
    /// Summary and step generation.
    pub fast: String,
    /// Briefing and synthesis.
    pub briefing: String,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_MODEL.to_string(),
            briefing: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReenterConfig {
    /// `ANTHROPIC_API_KEY`.
    pub api_key: Option<String>,
    /// `ANTHROPIC_BASE_URL`.
    pub base_url: Option<String>,
    pub models: Models,
}

impl ReenterConfig {
    pub fn from_env() -> Self {
        let defaults = Models::default();
        Self {
            api_key: env_string_opt("ANTHROPIC_API_KEY"),
            base_url: env_string_opt("ANTHROPIC_BASE_URL"),
            models: Models {
                fast: env_string_opt("REENTER_FAST_MODEL").unwrap_or(defaults.fast),
                briefing: env_string_opt("REENTER_MODEL").unwrap_or(defaults.briefing),
            },
        }
    }

    /// Client configuration; fails early when no API key is set.
    pub fn api_config(&self) -> Result<AnthropicApiConfig, AnthropicApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AnthropicApiError::MissingApiKey)?;
        let mut config = AnthropicApiConfig::new(api_key);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        Ok(config)
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
