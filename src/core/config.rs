//! Process configuration loaded from the environment.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub channel_id: u64,
    pub log_level: String,
    pub state_path: PathBuf,
    pub messages_path: PathBuf,
    pub cipher_key_path: PathBuf,
    pub night_log_path: PathBuf,
    pub assets_dir: PathBuf,
    pub command_prefix: String,
}

impl Config {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// `DISCORD_TOKEN` and `DISCORD_CHANNEL_ID` are required; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("{key} environment variable is required"))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let discord_token = required("DISCORD_TOKEN")?;
        let channel_raw = required("DISCORD_CHANNEL_ID")?;
        let channel_id = channel_raw
            .parse::<u64>()
            .with_context(|| format!("DISCORD_CHANNEL_ID must be a numeric id, got '{channel_raw}'"))?;

        Ok(Config {
            discord_token,
            channel_id,
            log_level: optional("LOG_LEVEL", "info"),
            state_path: optional("STATE_PATH", "state.json").into(),
            messages_path: optional("MESSAGES_PATH", "messages.json").into(),
            cipher_key_path: optional("CIPHER_KEY_PATH", "cipher.key").into(),
            night_log_path: optional("NIGHT_LOG_PATH", "night_log.txt").into(),
            assets_dir: optional("ASSETS_DIR", "assets").into(),
            command_prefix: optional("COMMAND_PREFIX", "!"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "token"),
            ("DISCORD_CHANNEL_ID", "123456"),
        ]))
        .unwrap();

        assert_eq!(config.channel_id, 123456);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.state_path, PathBuf::from("state.json"));
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.command_prefix, "!");
    }

    #[test]
    fn test_config_missing_token_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("DISCORD_CHANNEL_ID", "1")])).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn test_config_missing_channel_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "t")])).unwrap_err();
        assert!(err.to_string().contains("DISCORD_CHANNEL_ID"));
    }

    #[test]
    fn test_config_rejects_non_numeric_channel() {
        let result = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "t"),
            ("DISCORD_CHANNEL_ID", "general"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "t"),
            ("DISCORD_CHANNEL_ID", "9"),
            ("COMMAND_PREFIX", "?"),
            ("STATE_PATH", "/var/lib/bot/state.json"),
        ]))
        .unwrap();
        assert_eq!(config.command_prefix, "?");
        assert_eq!(config.state_path, PathBuf::from("/var/lib/bot/state.json"));
    }
}
