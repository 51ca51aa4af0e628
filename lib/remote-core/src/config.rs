//! Routing configuration loaded from YAML or JSON files

use crate::{CoreError, EndpointId, PluginId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// A plugin placed on a host by configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub plugin: PluginId,
    pub endpoint: EndpointId,
}

/// Static routing configuration: the expected hosts and initial bindings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Plugin host endpoints expected to register
    #[serde(default)]
    pub endpoints: Vec<EndpointId>,
    /// Initial plugin placement, applied in order (later entries win)
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

impl RouterConfig {
    /// Load a config file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw)?,
            _ => Self::from_yaml_str(&raw)?,
        };
        debug!(
            "Loaded routing config from {}: {} endpoints, {} bindings",
            path.display(),
            config.endpoints.len(),
            config.bindings.len()
        );
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty ids and duplicate endpoint declarations.
    ///
    /// Bindings to undeclared endpoints are accepted: hosts may register
    /// after their plugins are placed.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.as_str().is_empty() {
                return Err(CoreError::InvalidConfiguration(
                    "endpoint id must not be empty".to_string(),
                ));
            }
            if !seen.insert(endpoint) {
                return Err(CoreError::InvalidConfiguration(format!(
                    "endpoint {} declared more than once",
                    endpoint
                )));
            }
        }

        for binding in &self.bindings {
            if binding.plugin.as_str().is_empty() {
                return Err(CoreError::InvalidConfiguration(
                    "plugin id must not be empty".to_string(),
                ));
            }
            if binding.endpoint.as_str().is_empty() {
                return Err(CoreError::InvalidConfiguration(format!(
                    "plugin {} bound to an empty endpoint id",
                    binding.plugin
                )));
            }
            if !seen.contains(&binding.endpoint) {
                warn!(
                    "Plugin {} bound to undeclared endpoint {}",
                    binding.plugin, binding.endpoint
                );
            }
        }

        Ok(())
    }
}
