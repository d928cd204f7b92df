//! Registry composition
//!
//! Combines the built-in services with the host's configuration:
//!
//! 1. Services toggled with `true` form an allow-list. When it is non-empty,
//!    only those defaults survive; otherwise every default is kept.
//! 2. Object entries are validated. Invalid ones are dropped without error.
//! 3. Valid custom rules are merged field by field over an existing service of
//!    the same name, or added as new services.
//!
//! Toggles are filtered by shape, rules by content.

use tracing::{debug, warn};

use crate::config::EmbedConfig;
use crate::registry::{PatternTable, Registry};

/// Registry and pattern table produced for one tool configuration
#[derive(Debug, Clone)]
pub struct ComposedServices {
    /// Effective rules
    pub registry: Registry,
    /// Patterns for paste routing, one per registry entry
    pub patterns: PatternTable,
}

/// Build the effective registry for a configuration
pub fn compose(defaults: &Registry, config: &EmbedConfig) -> Registry {
    let mut registry = defaults.clone();

    let enabled = config.enabled_services();
    if !enabled.is_empty() {
        registry.retain(|name| enabled.contains(&name));
        debug!(services = ?enabled, "Restricted built-in services to allow-list");
    }

    for (name, draft) in config.custom_services() {
        let Some(rule) = draft.clone().into_rule() else {
            warn!(service = name, "Ignoring invalid custom service rule");
            continue;
        };

        match registry.get_mut(name) {
            Some(existing) => {
                existing.merge(rule);
                debug!(service = name, "Merged custom rule over existing service");
            }
            None => {
                registry.insert(name, rule);
                debug!(service = name, "Added custom service");
            }
        }
    }

    registry
}

/// Compose the registry and derive its pattern table
pub fn compose_with_patterns(defaults: &Registry, config: &EmbedConfig) -> ComposedServices {
    let registry = compose(defaults, config);
    let patterns = registry.patterns();
    ComposedServices { registry, patterns }
}
