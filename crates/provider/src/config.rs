//! Provider configuration

use std::path::Path;

use hedvig_common::{Error, RequestFormat, Result};
use serde::{Deserialize, Serialize};

use crate::state::{get_optional_string_attr, DynamicValue};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "hedvig.toml";

/// Provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Cluster node serving the management API (`host` or `host:port`)
    pub node: String,

    /// Session id handed to every command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Encoding of the `request` query parameter
    pub request_format: RequestFormat,
}

impl ProviderConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Read the provider block as handed over by the plugin host
    pub fn from_dynamic(value: &DynamicValue) -> Result<Self> {
        let request_format = match get_optional_string_attr(value, "request_format") {
            Some(format) => format.parse().map_err(Error::InvalidConfig)?,
            None => RequestFormat::default(),
        };

        Ok(Self {
            node: get_optional_string_attr(value, "node").unwrap_or_default(),
            session_id: get_optional_string_attr(value, "session_id"),
            request_format,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.node.trim().is_empty() {
            return Err(Error::InvalidConfig("node must be set".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{make_state, string_value};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProviderConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.request_format, RequestFormat::Legacy);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_CONFIG_FILE);
        let config = ProviderConfig {
            node: "node1:8080".to_string(),
            session_id: Some("abc".to_string()),
            request_format: RequestFormat::Json,
        };
        config.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("request_format = \"json\""));
        assert_eq!(ProviderConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "node = [").unwrap();
        assert!(matches!(
            ProviderConfig::load(&path),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_dynamic() {
        let value = make_state(vec![
            ("node", string_value("node1")),
            ("request_format", string_value("json")),
        ]);
        let config = ProviderConfig::from_dynamic(&value).unwrap();
        assert_eq!(config.node, "node1");
        assert_eq!(config.session_id, None);
        assert_eq!(config.request_format, RequestFormat::Json);

        let bad = make_state(vec![("request_format", string_value("xml"))]);
        assert!(ProviderConfig::from_dynamic(&bad).is_err());
    }

    #[test]
    fn test_validate_requires_node() {
        assert!(ProviderConfig::default().validate().is_err());
    }
}
