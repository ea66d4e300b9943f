//! Endpoint configuration.

use hmi_types::BusComponent;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bus component name used by the Remote Control endpoint.
pub const DEFAULT_COMPONENT_NAME: &str = "RC";

/// Reserved bus component id for Remote Control.
pub const DEFAULT_COMPONENT_ID: u32 = 900;

/// Delay between registration and the first settings notification.
pub const DEFAULT_SETTINGS_NOTIFICATION_DELAY_MS: u64 = 500;

/// Remote Control endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcConfig {
    /// Bus component name; method names are `<name>.<Method>`.
    pub component_name: String,
    /// Reserved component id sent at registration.
    pub component_id: u32,
    /// Value reported by `IsReady`.
    pub is_ready: bool,
    /// Milliseconds between registration and `OnRemoteControlSettings`.
    pub settings_notification_delay_ms: u64,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            component_name: DEFAULT_COMPONENT_NAME.to_string(),
            component_id: DEFAULT_COMPONENT_ID,
            is_ready: true,
            settings_notification_delay_ms: DEFAULT_SETTINGS_NOTIFICATION_DELAY_MS,
        }
    }
}

impl RcConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.component_name.is_empty() {
            return Err(ConfigError::EmptyComponentName);
        }
        if self.component_name.contains('.') {
            return Err(ConfigError::InvalidComponentName(
                self.component_name.clone(),
            ));
        }
        if self.component_id == 0 {
            return Err(ConfigError::ZeroComponentId);
        }
        Ok(())
    }

    pub fn component(&self) -> BusComponent {
        BusComponent::new(self.component_name.clone(), self.component_id)
    }

    pub fn settings_notification_delay(&self) -> Duration {
        Duration::from_millis(self.settings_notification_delay_ms)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("component_name must not be empty")]
    EmptyComponentName,

    #[error("component_name must not contain '.': {0}")]
    InvalidComponentName(String),

    #[error("component_id must be non-zero")]
    ZeroComponentId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RcConfig::default();
        assert_eq!(config.component_name, "RC");
        assert_eq!(config.component_id, 900);
        assert!(config.is_ready);
        assert_eq!(config.settings_notification_delay(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: RcConfig = serde_json::from_str(r#"{"is_ready": false}"#).unwrap();
        assert!(!config.is_ready);
        assert_eq!(config.component_id, 900);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut config = RcConfig::default();
        config.component_name = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyComponentName));

        config.component_name = "R.C".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidComponentName(_))
        ));
    }

    #[test]
    fn test_zero_id_rejected() {
        let config = RcConfig {
            component_id: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroComponentId));
    }

    #[test]
    fn test_component_identity() {
        let component = RcConfig::default().component();
        assert_eq!(component, BusComponent::new("RC", 900));
    }
}
