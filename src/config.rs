//! Runtime settings for talking to the workflow service.
//!
//! Values come from the process environment (after `.env` is loaded) and can be
//! overridden per command from the CLI.
use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use std::time::Duration;

pub const API_KEY_VAR: &str = "JULEP_API_KEY";
pub const ENVIRONMENT_VAR: &str = "JULEP_ENVIRONMENT";
pub const BASE_URL_VAR: &str = "JULEP_BASE_URL";
pub const MODEL_VAR: &str = "JULEP_MODEL";
pub const WEATHER_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";
pub const SEARCH_KEY_VAR: &str = "BRAVE_API_KEY";

pub const DEFAULT_MODEL: &str = "claude-3.5-sonnet";

/// Per-request HTTP timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Hosted deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Dev,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => "https://api.julep.ai/api",
            Environment::Dev => "https://dev.julep.ai/api",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "dev" | "development" => Ok(Environment::Dev),
            other => Err(anyhow!(
                "unknown environment {other:?} (expected \"production\" or \"dev\")"
            )),
        }
    }
}

/// Resolved settings for one command invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub weather_api_key: String,
    pub search_api_key: String,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or_else(|| {
            anyhow!("{API_KEY_VAR} is not set (add it to the environment or .env)")
        })?;
        let environment = match get(ENVIRONMENT_VAR) {
            Some(raw) => raw
                .parse::<Environment>()
                .with_context(|| format!("parse {ENVIRONMENT_VAR}"))?,
            None => Environment::default(),
        };
        let base_url = get(BASE_URL_VAR)
            .unwrap_or_else(|| environment.base_url().to_string())
            .trim_end_matches('/')
            .to_string();
        let model = get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let weather_api_key = get(WEATHER_KEY_VAR).unwrap_or_default();
        if weather_api_key.is_empty() {
            tracing::warn!("{WEATHER_KEY_VAR} is not set; the weather tool will be unauthenticated");
        }
        let search_api_key = get(SEARCH_KEY_VAR).unwrap_or_default();
        if search_api_key.is_empty() {
            tracing::warn!("{SEARCH_KEY_VAR} is not set; the search tool will be unauthenticated");
        }

        Ok(Settings {
            api_key,
            base_url,
            model,
            weather_api_key,
            search_api_key,
        })
    }
}

/// Load `.env` from the working directory if present. Existing variables win.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env"),
    }
}
