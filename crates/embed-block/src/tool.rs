//! Tool-level state shared by every embed block
//!
//! The host prepares the tool once with its configuration. The composed
//! registry and pattern table are immutable afterwards and every block holds
//! an `Arc` to the same [`EmbedTool`].

use embed_core::{
    compose_with_patterns, resolve, services, ComposedServices, EmbedConfig, EmbedDescriptor,
    PatternTable, Registry,
};
use std::sync::Arc;
use tracing::info;

use crate::Result;

/// Toolbox icon shown by the host
const TOOLBOX_ICON: &str = r#"<svg width="18" height="14" viewBox="0 0 18 14" xmlns="http://www.w3.org/2000/svg"><path d="M2 0h14a2 2 0 0 1 2 2v10a2 2 0 0 1-2 2H2a2 2 0 0 1-2-2V2a2 2 0 0 1 2-2zm5 4v6l5-3-5-3z"/></svg>"#;

/// Toolbox entry shown by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toolbox {
    /// SVG markup
    pub icon: &'static str,
    /// Human-readable tool name
    pub title: &'static str,
}

/// Paste routing handed to the host
#[derive(Debug, Clone, Copy)]
pub struct PasteConfig<'a> {
    /// Service name to pattern
    pub patterns: &'a PatternTable,
}

/// Embed tool composed from one configuration
#[derive(Debug)]
pub struct EmbedTool {
    services: ComposedServices,
}

impl EmbedTool {
    /// Compose the built-in services with the host configuration
    pub fn prepare(config: &EmbedConfig) -> Arc<Self> {
        Self::prepare_with(services::defaults(), config)
    }

    /// Compose a custom default table with the host configuration
    pub fn prepare_with(defaults: &Registry, config: &EmbedConfig) -> Arc<Self> {
        let services = compose_with_patterns(defaults, config);
        info!(services = services.registry.len(), "Embed tool prepared");
        Arc::new(Self { services })
    }

    /// Prepare from the host's raw JSON configuration
    pub fn from_json(config: serde_json::Value) -> Result<Arc<Self>> {
        let config = EmbedConfig::from_json(config)?;
        Ok(Self::prepare(&config))
    }

    /// Toolbox entry
    pub fn toolbox() -> Toolbox {
        Toolbox { icon: TOOLBOX_ICON, title: "Embed" }
    }

    /// Blocks of this tool can be shown read-only
    pub fn is_read_only_supported() -> bool {
        true
    }

    /// Patterns the host should intercept pastes with
    pub fn paste_config(&self) -> PasteConfig<'_> {
        PasteConfig { patterns: &self.services.patterns }
    }

    /// Effective service registry
    pub fn registry(&self) -> &Registry {
        &self.services.registry
    }

    /// Resolve a URL routed to `service`
    pub fn resolve(
        &self,
        service: &str,
        url: &str,
    ) -> embed_core::resolver::Result<EmbedDescriptor> {
        resolve(&self.services.registry, service, url)
    }
}
