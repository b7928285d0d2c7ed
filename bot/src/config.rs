//! Environment configuration.
//!
//! All settings come from the process environment (optionally seeded
//! from a `.env` file by the binary). Missing credentials or the folder
//! id are fatal at startup: the bot must not begin serving requests it
//! cannot answer.

use thiserror::Error;

use ragbot_retrieval::RetrievalConfig;

/// Default port for the webhook server.
const DEFAULT_PORT: u16 = 8080;

/// Errors raised while reading the configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Runtime configuration for the bot process.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token.
    pub telegram_token: String,

    /// OpenAI API key, used for embeddings and answers.
    pub openai_api_key: String,

    /// Bearer credential for the Drive API.
    pub drive_access_token: String,

    /// Identifier of the knowledge-base folder.
    pub drive_folder_id: String,

    /// Port the webhook server binds to.
    pub port: u16,

    /// Retrieval engine settings.
    pub retrieval: RetrievalConfig,
}

impl BotConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut retrieval = RetrievalConfig::new();
        if let Some(secs) = parsed(&lookup, "LISTING_TTL_SECS")? {
            retrieval = retrieval.with_listing_ttl_secs(secs);
        }
        if let Some(secs) = parsed(&lookup, "EMBEDDING_TTL_SECS")? {
            retrieval = retrieval.with_embedding_ttl_secs(secs);
        }
        if let Some(top_k) = parsed(&lookup, "TOP_K")? {
            retrieval = retrieval.with_top_k(top_k);
        }

        Ok(Self {
            telegram_token: require(&lookup, "TELEGRAM_BOT_TOKEN")?,
            openai_api_key: require(&lookup, "OPENAI_API_KEY")?,
            drive_access_token: require(&lookup, "DRIVE_ACCESS_TOKEN")?,
            drive_folder_id: require(&lookup, "DRIVE_FOLDER_ID")?,
            port: parsed(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT),
            retrieval,
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("TELEGRAM_BOT_TOKEN", "tg-token"),
            ("OPENAI_API_KEY", "oa-key"),
            ("DRIVE_ACCESS_TOKEN", "drive-token"),
            ("DRIVE_FOLDER_ID", "folder-1"),
        ])
    }

    fn from_vars(vars: &HashMap<&'static str, &'static str>) -> Result<BotConfig, ConfigError> {
        BotConfig::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()))
    }

    #[test]
    fn reads_required_values_and_defaults() {
        let config = from_vars(&base_vars()).unwrap();

        assert_eq!(config.telegram_token, "tg-token");
        assert_eq!(config.drive_folder_id, "folder-1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.listing_ttl_secs, 600);
        assert_eq!(config.retrieval.embedding_ttl_secs, 86_400);
    }

    #[test]
    fn missing_credential_is_fatal() {
        let mut vars = base_vars();
        vars.remove("DRIVE_FOLDER_ID");

        assert_eq!(
            from_vars(&vars).unwrap_err(),
            ConfigError::MissingVar("DRIVE_FOLDER_ID")
        );
    }

    #[test]
    fn empty_credential_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("OPENAI_API_KEY", "  ");

        assert_eq!(
            from_vars(&vars).unwrap_err(),
            ConfigError::MissingVar("OPENAI_API_KEY")
        );
    }

    #[test]
    fn overrides_apply() {
        let mut vars = base_vars();
        vars.insert("PORT", "9090");
        vars.insert("LISTING_TTL_SECS", "60");
        vars.insert("TOP_K", "5");

        let config = from_vars(&vars).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.retrieval.listing_ttl_secs, 60);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn unparseable_override_is_rejected() {
        let mut vars = base_vars();
        vars.insert("PORT", "not-a-port");

        assert!(matches!(
            from_vars(&vars),
            Err(ConfigError::InvalidVar { name: "PORT", .. })
        ));
    }
}
