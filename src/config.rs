//! Configuration loader — merges env vars, .env file, and config.toml.

use common::{ClientConfig, Error};
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &ClientConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    let base = config.base_url.trim();
    if base.is_empty() {
        issues.push("base_url must not be empty".into());
    } else if !base.starts_with("http://") && !base.starts_with("https://") {
        issues.push("base_url must start with http:// or https://".into());
    }

    if config.timing.request_timeout_secs == 0 {
        issues.push("timing.request_timeout_secs must be > 0".into());
    }
    if config.timing.health_timeout_secs == 0 {
        issues.push("timing.health_timeout_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load client configuration from environment and optional config file.
pub fn load_config() -> Result<ClientConfig, Error> {
    // 1. Load .env file when present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = ClientConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(url) = std::env::var("SIGNAL_API_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(key) = std::env::var("SIGNAL_API_KEY") {
        config.api_key = key;
    }
    if let Ok(raw) = std::env::var("SIGNAL_REQUEST_TIMEOUT_SECS") {
        config.timing.request_timeout_secs =
            parse_positive_u64(&raw, "SIGNAL_REQUEST_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("SIGNAL_HEALTH_TIMEOUT_SECS") {
        config.timing.health_timeout_secs =
            parse_positive_u64(&raw, "SIGNAL_HEALTH_TIMEOUT_SECS")?;
    }

    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = ClientConfig::default();
        config.base_url = "ftp://example".into();
        assert!(matches!(validate_config(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = ClientConfig::default();
        config.timing.health_timeout_secs = 0;
        config.timing.request_timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("request_timeout_secs"));
        assert!(message.contains("health_timeout_secs"));
    }

    #[test]
    fn test_positive_parse_rejects_zero_and_garbage() {
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("ten", "X").is_err());
        assert_eq!(parse_positive_u64(" 30 ", "X").unwrap(), 30);
    }
}
