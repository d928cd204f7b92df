//! Host editor collaborators
//!
//! The host owns the DOM. It tells a block about pasted URLs and hands over
//! the live caption when the block is saved.

use serde::{Deserialize, Serialize};

/// A paste routed to this tool by the host
///
/// The host has already matched `data` against the tool's pattern table and
/// tagged it with the matching service `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteEvent {
    /// Service key from the pattern table
    pub key: String,
    /// Pasted URL
    pub data: String,
}

impl PasteEvent {
    /// Create a paste event
    pub fn new(key: impl Into<String>, data: impl Into<String>) -> Self {
        Self { key: key.into(), data: data.into() }
    }
}

/// Source of the caption's current editable content
#[cfg_attr(test, mockall::automock)]
pub trait CaptionSource {
    /// Current caption, or `None` when the caption element is absent
    fn caption(&self) -> Option<String>;
}

impl CaptionSource for str {
    fn caption(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl CaptionSource for String {
    fn caption(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl CaptionSource for Option<String> {
    fn caption(&self) -> Option<String> {
        self.clone()
    }
}
