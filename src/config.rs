use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Per-session settings handed over by the page. Every field has a default so
/// `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user: String,
    pub hostname: String,
    /// Account name inside Freed OS; its home is `/home/<freed_user>`.
    pub freed_user: String,
    /// Pins the dice for a reproducible session.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user: "user".into(),
            hostname: "matrix-terminal".into(),
            freed_user: "neo".into(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("user", &self.user),
            ("hostname", &self.hostname),
            ("freed_user", &self.freed_user),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }
        Ok(())
    }

    pub fn home(&self) -> Vec<String> {
        vec!["home".into(), self.user.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.home(), vec!["home", "user"]);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json(r#"{"user":"trinity","seed":7}"#).unwrap();
        assert_eq!(config.user, "trinity");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.freed_user, "neo");
    }

    #[test]
    fn test_rejects_blank_names() {
        let err = Config::from_json(r#"{"hostname":"  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Empty { field: "hostname" }));
        assert!(Config::from_json("not json").is_err());
    }
}
