//! # Runtime Configuration
//!
//! Defaults with environment overrides. Unparseable values are logged and
//! ignored; only an invalid component setup is fatal.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HMI_RC_READY` | `true` | Value reported by `RC.IsReady` |
//! | `HMI_RC_SETTINGS_DELAY_MS` | `500` | Delay of the first settings notification |
//! | `HMI_DRIVER_DEVICE` | unset | Name of the driver's device |
//! | `HMI_REVERSE_ENABLED` | `true` | Whether remote control is allowed |
//! | `HMI_ACCESS_MODE` | `AUTO_ALLOW` | `AUTO_ALLOW`, `AUTO_DENY` or `ASK_DRIVER` |
//! | `HMI_APPS` | empty | `id:name:device` entries separated by `;` |

use std::env;

use rc_remote_control::{AccessMode, AppId, ConfigError, RcConfig};
use tracing::warn;

/// An application pre-registered with the reference registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEntry {
    pub app_id: AppId,
    pub app_name: String,
    pub device_name: String,
}

impl ApplicationEntry {
    /// Parse `id:name:device`.
    pub fn parse(entry: &str) -> Option<Self> {
        let mut parts = entry.splitn(3, ':');
        let app_id = parts.next()?.trim().parse().ok()?;
        let app_name = parts.next()?.trim();
        let device_name = parts.next()?.trim();
        if app_name.is_empty() || device_name.is_empty() {
            return None;
        }
        Some(Self {
            app_id,
            app_name: app_name.to_string(),
            device_name: device_name.to_string(),
        })
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// RC endpoint settings.
    pub rc: RcConfig,
    /// Initial driver device.
    pub driver_device: Option<String>,
    /// Initial reverse-functionality flag.
    pub reverse_enabled: bool,
    /// Initial access mode.
    pub access_mode: AccessMode,
    /// Applications known at startup.
    pub applications: Vec<ApplicationEntry>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rc: RcConfig::default(),
            driver_device: None,
            reverse_enabled: true,
            access_mode: AccessMode::AutoAllow,
            applications: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("HMI_RC_READY") {
            match parse_bool(&value) {
                Some(ready) => config.rc.is_ready = ready,
                None => warn!(value = %value, "HMI_RC_READY must be true or false"),
            }
        }
        if let Some(value) = lookup("HMI_RC_SETTINGS_DELAY_MS") {
            match value.trim().parse() {
                Ok(delay) => config.rc.settings_notification_delay_ms = delay,
                Err(_) => warn!(value = %value, "HMI_RC_SETTINGS_DELAY_MS must be milliseconds"),
            }
        }
        if let Some(value) = lookup("HMI_DRIVER_DEVICE") {
            let name = value.trim();
            config.driver_device = (!name.is_empty()).then(|| name.to_string());
        }
        if let Some(value) = lookup("HMI_REVERSE_ENABLED") {
            match parse_bool(&value) {
                Some(enabled) => config.reverse_enabled = enabled,
                None => warn!(value = %value, "HMI_REVERSE_ENABLED must be true or false"),
            }
        }
        if let Some(value) = lookup("HMI_ACCESS_MODE") {
            match value.trim().parse() {
                Ok(mode) => config.access_mode = mode,
                Err(e) => warn!(error = %e, "Ignoring HMI_ACCESS_MODE"),
            }
        }
        if let Some(value) = lookup("HMI_APPS") {
            for entry in value.split(';').filter(|e| !e.trim().is_empty()) {
                match ApplicationEntry::parse(entry) {
                    Some(app) => config.applications.push(app),
                    None => warn!(entry = %entry, "HMI_APPS entries must be id:name:device"),
                }
            }
        }

        config.rc.validate()?;
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.rc.settings_notification_delay_ms, 500);
        assert!(config.rc.is_ready);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HMI_RC_READY", "false"),
            ("HMI_RC_SETTINGS_DELAY_MS", "250"),
            ("HMI_DRIVER_DEVICE", "Driver Phone"),
            ("HMI_REVERSE_ENABLED", "0"),
            ("HMI_ACCESS_MODE", "ASK_DRIVER"),
            ("HMI_APPS", "1:Navigation:Driver Phone; 2:Music:Passenger Phone"),
        ]);
        assert!(!config.rc.is_ready);
        assert_eq!(config.rc.settings_notification_delay_ms, 250);
        assert_eq!(config.driver_device.as_deref(), Some("Driver Phone"));
        assert!(!config.reverse_enabled);
        assert_eq!(config.access_mode, AccessMode::AskDriver);
        assert_eq!(config.applications.len(), 2);
        assert_eq!(config.applications[1].device_name, "Passenger Phone");
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = load(&[
            ("HMI_RC_SETTINGS_DELAY_MS", "soon"),
            ("HMI_ACCESS_MODE", "MAYBE"),
            ("HMI_APPS", "x:Nav:Phone;3:Radio"),
        ]);
        assert_eq!(config.rc.settings_notification_delay_ms, 500);
        assert_eq!(config.access_mode, AccessMode::AutoAllow);
        assert!(config.applications.is_empty());
    }

    #[test]
    fn test_application_entry_keeps_colons_in_device() {
        let app = ApplicationEntry::parse("7:Nav:Phone:A").unwrap();
        assert_eq!(app.app_id, 7);
        assert_eq!(app.device_name, "Phone:A");
    }
}
