//! Configuration loading from environment.

use std::env;

/// Configuration of the notification listener.
pub struct ListenConfig {
    pub port: u16,
    pub secret2: String,
    pub check_ip: bool,
    pub trust_proxy: bool,
}

impl ListenConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let secret2 = env::var("FREEKASSA_SECRET2")
            .map_err(|_| anyhow::anyhow!("FREEKASSA_SECRET2 environment variable is required"))?;

        Ok(Self {
            port,
            secret2,
            check_ip: flag("FREEKASSA_CHECK_IP", true)?,
            trust_proxy: flag("FREEKASSA_TRUST_PROXY", false)?,
        })
    }
}

fn flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value)
            .ok_or_else(|| anyhow::anyhow!("{} must be true or false, got {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
