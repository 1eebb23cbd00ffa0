//! Kit settings parsed from the host configuration map.

use crate::Error;
use std::collections::HashMap;

/// Name this kit registers under with the host framework.
pub const KIT_NAME: &str = "Apteligent";

/// Settings key holding the Apteligent application identifier.
pub const APP_ID_KEY: &str = "appid";

/// Settings key enabling vendor-side service monitoring.
pub const SERVICE_MONITORING_KEY: &str = "service_monitoring_enabled";

/// Host environment the application is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

/// Validated kit settings.
#[derive(Debug, Clone)]
pub struct KitSettings {
    pub(crate) app_id: String,
    pub(crate) service_monitoring_enabled: bool,
}

impl KitSettings {
    /// Parse settings out of the host configuration map.
    ///
    /// `appid` is required; `service_monitoring_enabled` is a truthy string
    /// defaulting to false.
    pub fn from_map(settings: &HashMap<String, String>) -> Result<Self, Error> {
        let app_id = settings
            .get(APP_ID_KEY)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Config(format!("{APP_ID_KEY} cannot be empty")))?;

        let service_monitoring_enabled = settings
            .get(SERVICE_MONITORING_KEY)
            .is_some_and(|value| parse_truthy(value));

        Ok(Self {
            app_id: app_id.clone(),
            service_monitoring_enabled,
        })
    }

    /// Get the Apteligent application identifier.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Whether vendor-side service monitoring is enabled.
    pub fn service_monitoring_enabled(&self) -> bool {
        self.service_monitoring_enabled
    }
}

fn parse_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let parsed = KitSettings::from_map(&settings(&[(APP_ID_KEY, "crit_app")])).unwrap();

        assert_eq!(parsed.app_id(), "crit_app");
        assert!(!parsed.service_monitoring_enabled());
    }

    #[test]
    fn test_service_monitoring_truthy_values() {
        for value in ["true", "TRUE", "True", "1"] {
            let parsed = KitSettings::from_map(&settings(&[
                (APP_ID_KEY, "crit_app"),
                (SERVICE_MONITORING_KEY, value),
            ]))
            .unwrap();
            assert!(parsed.service_monitoring_enabled(), "value: {value}");
        }
    }

    #[test]
    fn test_service_monitoring_falsy_values() {
        for value in ["false", "0", "no", ""] {
            let parsed = KitSettings::from_map(&settings(&[
                (APP_ID_KEY, "crit_app"),
                (SERVICE_MONITORING_KEY, value),
            ]))
            .unwrap();
            assert!(!parsed.service_monitoring_enabled(), "value: {value}");
        }
    }

    #[test]
    fn test_missing_app_id_fails() {
        let result = KitSettings::from_map(&settings(&[]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_app_id_fails() {
        let result = KitSettings::from_map(&settings(&[(APP_ID_KEY, "")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
