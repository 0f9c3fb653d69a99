//! World configuration
//!
//! A world can be configured from a TOML document such as:
//!
//! ```toml
//! duplicate_policy = "replace"
//! entity_capacity = 4096
//! component_capacity = 1024
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// What happens when a component is added to an entity that already owns
/// one of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The add fails and the existing component is left untouched.
    #[default]
    Reject,
    /// The existing component is overwritten in place.
    Replace,
}

/// Tunables for a `World`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Behaviour of a second add of the same component type to one entity.
    pub duplicate_policy: DuplicatePolicy,
    /// Entity slots to reserve up front.
    pub entity_capacity: usize,
    /// Dense slots to reserve in each newly created component store.
    pub component_capacity: usize,
}

impl WorldConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded world config from {:?}", path);
        Ok(config)
    }

    /// Builder-style override of the duplicate policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rejects_duplicates() {
        let config = WorldConfig::default();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.entity_capacity, 0);
        assert_eq!(config.component_capacity, 0);
    }

    #[test]
    fn parse_full_document() {
        let config = WorldConfig::from_toml_str(
            r#"
            duplicate_policy = "replace"
            entity_capacity = 4096
            component_capacity = 128
            "#,
        )
        .unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
        assert_eq!(config.entity_capacity, 4096);
        assert_eq!(config.component_capacity, 128);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = WorldConfig::from_toml_str("entity_capacity = 10").unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.entity_capacity, 10);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let err = WorldConfig::from_toml_str(r#"duplicate_policy = "merge""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file() {
        let err = WorldConfig::load("/nonexistent/tessera/world.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("tessera-config-{}.toml", std::process::id()));
        fs::write(&path, "duplicate_policy = \"replace\"\n").unwrap();
        let config = WorldConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
    }

    #[test]
    fn with_duplicate_policy_overrides() {
        let config = WorldConfig::default().with_duplicate_policy(DuplicatePolicy::Replace);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
    }
}
