//! Resolving a URL into an embeddable resource
//!
//! Given a registry, a service key (as routed by the host) and the pasted
//! URL, runs the service's rule and builds the embed URL.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{trace, warn};

use crate::registry::Registry;

/// Errors that can occur while resolving a URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No service registered under the key
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// The service pattern does not match the URL
    #[error("URL does not match service {service}: {url}")]
    NoMatch {
        /// Service key
        service: String,
        /// URL that was tested
        url: String,
    },

    /// The pattern matched but no resource id could be extracted
    #[error("No resource id in URL for service {service}")]
    MissingId {
        /// Service key
        service: String,
    },
}

/// Result type for resolution
pub type Result<T> = std::result::Result<T, ResolveError>;

/// A resolved embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedDescriptor {
    /// Service key
    pub service: String,
    /// Original URL
    pub source: String,
    /// Embeddable URL
    pub embed: String,
    /// Frame width hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Frame height hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Resolve `url` with the rule registered under `service`
pub fn resolve(registry: &Registry, service: &str, url: &str) -> Result<EmbedDescriptor> {
    let rule = registry.get(service).ok_or_else(|| {
        warn!(service, "Resolution requested for unknown service");
        ResolveError::UnknownService(service.to_string())
    })?;

    let captures = rule.pattern.captures(url).ok_or_else(|| {
        warn!(service, url, "URL does not match service pattern");
        ResolveError::NoMatch { service: service.to_string(), url: url.to_string() }
    })?;

    let groups: Vec<Option<&str>> =
        captures.iter().skip(1).map(|group| group.map(|m| m.as_str())).collect();

    let resource_id = rule
        .resource_id(&groups)
        .ok_or_else(|| ResolveError::MissingId { service: service.to_string() })?;

    let embed = rule.embed_url(&resource_id);
    trace!(service, resource_id = %resource_id, embed = %embed, "Resolved embed");

    Ok(EmbedDescriptor {
        service: service.to_string(),
        source: url.to_string(),
        embed,
        width: rule.frame_width,
        height: rule.frame_height,
    })
}
