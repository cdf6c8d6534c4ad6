//! Startup configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ashen_veil_telegram::client::DEFAULT_API_URL;

use crate::error::AppError;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_NPC_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SESSIONS_PATH: &str = "sessions.json";

/// Credentials for the generated NPC strategy.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Chat model name.
    pub model: String,
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub telegram_api_url: String,
    /// `None` selects the template NPC strategy.
    pub openai: Option<OpenAiConfig>,
    pub npc_timeout: Duration,
    pub sessions_path: PathBuf,
    pub autosave: bool,
    pub listen_addr: SocketAddr,
    pub otlp_endpoint: Option<String>,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("telegram_api_url", &self.telegram_api_url)
            .field("openai", &self.openai)
            .field("npc_timeout", &self.npc_timeout)
            .field("sessions_path", &self.sessions_path)
            .field("autosave", &self.autosave)
            .field("listen_addr", &self.listen_addr)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish_non_exhaustive()
    }
}

impl BotConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `BOT_TOKEN` is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, treating empty values as absent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `BOT_TOKEN` is missing or a value fails
    /// to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = var("BOT_TOKEN")
            .ok_or_else(|| AppError::Config("BOT_TOKEN environment variable must be set".into()))?;

        let openai = var("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
            api_key,
            model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_owned()),
            base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned()),
        });

        let npc_timeout_secs = match var("NPC_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("NPC_TIMEOUT_SECS must be a valid u64: {e}")))?,
            None => DEFAULT_NPC_TIMEOUT_SECS,
        };

        let autosave = match var("AUTOSAVE") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| AppError::Config(format!("AUTOSAVE must be true or false, got {raw:?}")))?,
            None => true,
        };

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port: u16 = var("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        Ok(Self {
            bot_token,
            telegram_api_url: var("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            openai,
            npc_timeout: Duration::from_secs(npc_timeout_secs),
            sessions_path: var("SESSIONS_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_SESSIONS_PATH), PathBuf::from),
            autosave,
            listen_addr,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<BotConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        BotConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_bot_token_is_a_config_error() {
        // Act
        let result = config_from(&[("OPENAI_API_KEY", "sk-test")]);

        // Assert
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("BOT_TOKEN")));
    }

    #[test]
    fn test_blank_bot_token_counts_as_missing() {
        assert!(config_from(&[("BOT_TOKEN", "   ")]).is_err());
    }

    #[test]
    fn test_defaults_apply_when_only_the_token_is_set() {
        // Act
        let config = config_from(&[("BOT_TOKEN", "123:abc")]).unwrap();

        // Assert
        assert_eq!(config.bot_token, "123:abc");
        assert!(config.openai.is_none());
        assert_eq!(config.npc_timeout, Duration::from_secs(15));
        assert_eq!(config.sessions_path, PathBuf::from("sessions.json"));
        assert!(config.autosave);
        assert_eq!(config.listen_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.telegram_api_url, DEFAULT_API_URL);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_openai_key_selects_generated_settings_with_model_override() {
        // Act
        let config = config_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
        ])
        .unwrap();

        // Assert
        let openai = config.openai.unwrap();
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.base_url, DEFAULT_OPENAI_BASE_URL);
    }

    #[test]
    fn test_autosave_can_be_disabled() {
        let config = config_from(&[("BOT_TOKEN", "t"), ("AUTOSAVE", "false")]).unwrap();

        assert!(!config.autosave);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = config_from(&[("BOT_TOKEN", "t"), ("PORT", "99999")]);

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("PORT")));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let config = config_from(&[("BOT_TOKEN", "123:secret"), ("OPENAI_API_KEY", "sk-hidden")]).unwrap();

        let rendered = format!("{config:?}");

        assert!(!rendered.contains("123:secret"));
        assert!(!rendered.contains("sk-hidden"));
    }
}
