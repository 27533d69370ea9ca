//! Configuration for the equation simplifier.
//!
//! Provides the [`SimplifierConfig`] struct selecting which LLM provider and
//! model the simplifier talks to. Users construct this manually or load it
//! from the environment; no file parsing dependencies are required.
//!
//! # Example
//!
//! ```rust
//! use calcwand::config::{Provider, SimplifierConfig};
//! use calcwand::ClientWrapper;
//!
//! // Defaults: OpenAI, gpt-4.1-nano, no key yet
//! let config = SimplifierConfig::default();
//! assert_eq!(config.provider, Provider::OpenAI);
//!
//! // Or spell everything out
//! let config = SimplifierConfig {
//!     provider: Provider::Gemini,
//!     model: "gemini-2.0-flash".to_string(),
//!     api_key: "my-key".to_string(),
//!     base_url: None,
//! };
//! let client = config.build_client()?;
//! assert_eq!(client.model_name(), "gemini-2.0-flash");
//! # Ok::<(), calcwand::config::ConfigError>(())
//! ```

use std::env;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::client_wrapper::ClientWrapper;
use crate::clients::gemini::GeminiClient;
use crate::clients::openai::OpenAIClient;

pub const PROVIDER_ENV: &str = "CALCWAND_PROVIDER";
pub const MODEL_ENV: &str = "CALCWAND_MODEL";
pub const BASE_URL_ENV: &str = "CALCWAND_BASE_URL";

/// LLM vendors the simplifier can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Provider::OpenAI => "OPEN_AI_SECRET",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4.1-nano",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "gemini" | "google" | "googleai" => Ok(Provider::Gemini),
            other => Err(ConfigError::new(format!("unknown provider '{}'", other))),
        }
    }
}

/// Error raised while loading a [`SimplifierConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl Error for ConfigError {}

/// Which provider, model and credentials the simplifier uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifierConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
    /// Overrides the provider's endpoint, e.g. for a self-hosted gateway.
    pub base_url: Option<String>,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        SimplifierConfig {
            provider: Provider::OpenAI,
            model: Provider::OpenAI.default_model().to_string(),
            api_key: String::new(),
            base_url: None,
        }
    }
}

impl SimplifierConfig {
    /// Load from `CALCWAND_PROVIDER`, `CALCWAND_MODEL`, `CALCWAND_BASE_URL`
    /// and the provider's API key variable.
    ///
    /// A missing API key is an error; everything else falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`SimplifierConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup(PROVIDER_ENV) {
            Some(value) => value.parse()?,
            None => Provider::OpenAI,
        };
        let model = lookup(MODEL_ENV)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());
        let api_key = lookup(provider.api_key_env())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::new(format!("{} is not set", provider.api_key_env()))
            })?;
        let base_url = match lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            Some(url) => Some(validate_base_url(&url)?),
            None => None,
        };

        log::debug!(
            "SimplifierConfig: provider={:?} model={} custom_base_url={}",
            provider,
            model,
            base_url.is_some()
        );

        Ok(SimplifierConfig {
            provider,
            model,
            api_key,
            base_url,
        })
    }

    /// Instantiate the configured client.
    ///
    /// Fails if `base_url` is set but is not an absolute URL.
    pub fn build_client(&self) -> Result<Arc<dyn ClientWrapper>, ConfigError> {
        if let Some(url) = &self.base_url {
            validate_base_url(url)?;
        }
        let client: Arc<dyn ClientWrapper> = match (self.provider, &self.base_url) {
            (Provider::OpenAI, None) => {
                Arc::new(OpenAIClient::new_with_model_string(&self.api_key, &self.model))
            }
            (Provider::OpenAI, Some(url)) => Arc::new(OpenAIClient::new_with_base_url(
                &self.api_key,
                &self.model,
                url,
            )),
            (Provider::Gemini, None) => {
                Arc::new(GeminiClient::new_with_model_string(&self.api_key, &self.model))
            }
            (Provider::Gemini, Some(url)) => Arc::new(GeminiClient::new_with_base_url(
                &self.api_key,
                &self.model,
                url,
            )),
        };
        Ok(client)
    }
}

fn validate_base_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    reqwest::Url::parse(url)
        .map_err(|e| ConfigError::new(format!("invalid {} '{}': {}", BASE_URL_ENV, url, e)))?;
    Ok(url.to_string())
}
