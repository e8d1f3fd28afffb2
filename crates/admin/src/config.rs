//! Management surface configuration
use cachewrap_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Settings for the cache management endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Application whose entries are managed when a request names none
    pub app_name: String,
    /// Page size used when a request asks for 0
    pub default_page_size: usize,
    /// Upper bound for requested page sizes
    pub max_page_size: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            app_name: "default".to_string(),
            default_page_size: 20,
            max_page_size: 200,
        }
    }
}

impl AdminConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    pub fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    /// Parse and validate a configuration document
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: AdminConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::invalid("app_name", "must not be empty"));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::invalid(
                "default_page_size",
                "must be greater than zero",
            ));
        }
        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::invalid(
                "max_page_size",
                format!(
                    "must be at least default_page_size ({})",
                    self.default_page_size
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AdminConfig::default().validate().is_ok());
    }

    #[test]
    fn parses_with_defaults_for_missing_fields() {
        let config = AdminConfig::from_json_str(r#"{"app_name": "shop"}"#).unwrap();
        assert_eq!(config.app_name, "shop");
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.max_page_size, 200);
    }

    #[test]
    fn rejects_inconsistent_page_sizes() {
        let err = AdminConfig::from_json_str(
            r#"{"app_name": "shop", "default_page_size": 50, "max_page_size": 10}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "max_page_size"));

        let err = AdminConfig::from_json_str(r#"{"app_name": " "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "app_name"));
    }
}
