//! Bus component identity.

use serde::{Deserialize, Serialize};

/// Name and reserved numeric id under which a component registers with the bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusComponent {
    pub name: String,
    pub id: u32,
}

impl BusComponent {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    /// Fully qualified method name, e.g. `RC.IsReady`.
    pub fn qualify(&self, short_name: &str) -> String {
        format!("{}.{}", self.name, short_name)
    }

    /// Strip this component's prefix from `method`.
    ///
    /// Returns `None` unless `method` is exactly `<name>.<Short>` with a
    /// non-empty short name.
    pub fn short_method<'a>(&self, method: &'a str) -> Option<&'a str> {
        let rest = method.strip_prefix(self.name.as_str())?;
        let short = rest.strip_prefix('.')?;
        if short.is_empty() || short.contains('.') {
            None
        } else {
            Some(short)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify() {
        let rc = BusComponent::new("RC", 900);
        assert_eq!(rc.qualify("IsReady"), "RC.IsReady");
    }

    #[test]
    fn test_short_method() {
        let rc = BusComponent::new("RC", 900);
        assert_eq!(rc.short_method("RC.IsReady"), Some("IsReady"));
        assert_eq!(rc.short_method("RC."), None);
        assert_eq!(rc.short_method("RCX.IsReady"), None);
        assert_eq!(rc.short_method("UI.Alert"), None);
        assert_eq!(rc.short_method("RC.A.B"), None);
    }
}
