//! Persisted block state

use embed_core::EmbedDescriptor;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// State of one embed block, as saved by the host
///
/// An empty block has no service. `caption` is always present and defaults
/// to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedRecord {
    /// Service key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Original URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Embeddable URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<String>,
    /// Frame width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Frame height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Caption text
    #[serde(default)]
    pub caption: String,
}

/// Fields supplied in a data assignment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordPatch {
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    embed: Option<String>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    caption: Option<String>,
}

impl EmbedRecord {
    /// Whether the block has not been resolved yet
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
    }

    /// Apply a partial update from the host
    ///
    /// Only non-empty strings and non-zero sizes overwrite the current
    /// values; everything else is kept.
    pub fn update(&mut self, value: &serde_json::Value) -> Result<()> {
        if !value.is_object() {
            return Err(Error::InvalidData(json_kind(value).to_string()));
        }

        let patch: RecordPatch = serde_json::from_value(value.clone())?;
        self.apply(patch);
        Ok(())
    }

    /// Replace the embed fields with a resolved embed, keeping the caption
    ///
    /// Sizes the new rule does not hint are cleared, not inherited.
    pub fn apply_descriptor(&mut self, descriptor: EmbedDescriptor) {
        self.service = Some(descriptor.service);
        self.source = Some(descriptor.source);
        self.embed = Some(descriptor.embed);
        self.width = descriptor.width;
        self.height = descriptor.height;
    }

    fn apply(&mut self, patch: RecordPatch) {
        overwrite_text(&mut self.service, patch.service);
        overwrite_text(&mut self.source, patch.source);
        overwrite_text(&mut self.embed, patch.embed);
        overwrite_size(&mut self.width, patch.width);
        overwrite_size(&mut self.height, patch.height);
        if let Some(caption) = patch.caption.filter(|c| !c.is_empty()) {
            self.caption = caption;
        }
    }
}

fn overwrite_text(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *slot = Some(value);
    }
}

fn overwrite_size(slot: &mut Option<f64>, value: Option<f64>) {
    if let Some(value) = value.filter(|v| *v != 0.0) {
        *slot = Some(value);
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
