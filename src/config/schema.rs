//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Path prefixes handed to the bridge (e.g. "/api").
    pub routes: Vec<String>,

    /// Per-request feature set settings.
    pub features: FeatureConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Per-request feature set settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FeatureConfig {
    /// Reject pipeline writes to the feature set.
    pub read_only: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: BridgeConfig = toml::from_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert!(config.routes.is_empty());
        assert!(!config.features.read_only);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config: BridgeConfig = toml::from_str(
            r#"
            routes = ["/api", "/legacy"]

            [features]
            read_only = true
            "#,
        )
        .unwrap();

        assert_eq!(config.routes, vec!["/api", "/legacy"]);
        assert!(config.features.read_only);
        assert_eq!(config.observability.log_level, "info");
    }
}
