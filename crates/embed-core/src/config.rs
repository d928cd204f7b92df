//! Tool configuration
//!
//! The host passes a JSON object like:
//!
//! ```json
//! {
//!   "services": {
//!     "youtube": true,
//!     "coub": true,
//!     "intranet": {
//!       "regex": "https://video\\.corp/watch/(\\w+)",
//!       "embedUrl": "https://video.corp/embed/<%= remote_id %>",
//!       "html": "<iframe height=\"300\"></iframe>",
//!       "height": 300,
//!       "width": 600
//!     }
//!   }
//! }
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use tracing::warn;

use crate::rule::RuleDraft;

/// Configuration for the embed tool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    /// Per-service toggles and custom rules
    #[serde(default, deserialize_with = "services_or_empty")]
    pub services: HashMap<String, ServiceSetting>,
}

/// Anything other than an object under `services` counts as no settings
fn services_or_empty<'de, D>(deserializer: D) -> Result<HashMap<String, ServiceSetting>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(entries) => entries
            .into_iter()
            .map(|(name, value)| {
                let setting: ServiceSetting =
                    serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok::<_, D::Error>((name, setting))
            })
            .collect(),
        serde_json::Value::Null => Ok(HashMap::new()),
        other => {
            warn!(services = %other, "Ignoring services setting that is not an object");
            Ok(HashMap::new())
        }
    }
}

impl EmbedConfig {
    /// Parse configuration from the host's JSON value
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }

    /// Enable a built-in service
    pub fn enable(mut self, name: impl Into<String>) -> Self {
        self.services.insert(name.into(), ServiceSetting::Toggle(true));
        self
    }

    /// Add or override a service with a custom rule
    pub fn custom(mut self, name: impl Into<String>, draft: RuleDraft) -> Self {
        self.services.insert(name.into(), ServiceSetting::Custom(draft));
        self
    }

    /// Names of services switched on with `true`
    pub fn enabled_services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .services
            .iter()
            .filter(|(_, setting)| matches!(setting, ServiceSetting::Toggle(true)))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Custom rule drafts, in name order
    pub fn custom_services(&self) -> Vec<(&str, &RuleDraft)> {
        let mut drafts: Vec<(&str, &RuleDraft)> = self
            .services
            .iter()
            .filter_map(|(name, setting)| match setting {
                ServiceSetting::Custom(draft) => Some((name.as_str(), draft)),
                _ => None,
            })
            .collect();
        drafts.sort_unstable_by_key(|(name, _)| *name);
        drafts
    }
}

/// A single entry of the `services` map
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceSetting {
    /// `true` enables a built-in service; `false` has no effect
    Toggle(bool),
    /// A custom or overriding rule
    Custom(RuleDraft),
    /// Anything else (numbers, strings, arrays); ignored
    Unrecognized(serde_json::Value),
}
