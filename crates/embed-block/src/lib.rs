//! Embed block tool
//!
//! This crate is the block-editor side of embedding: a tool composed once
//! from configuration and shared by every block, the per-block state machine
//! driven by the host's paste notifications, the persisted record, and the
//! preview readiness signal.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod host;
pub mod readiness;
pub mod record;
pub mod tool;

pub use block::{BlockView, EmbedBlock};
pub use host::{CaptionSource, PasteEvent};
pub use readiness::{Readiness, ReadyHandle, ReadySignal, QUIET_PERIOD};
pub use record::EmbedRecord;
pub use tool::{EmbedTool, PasteConfig, Toolbox};

/// Result type for block operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for block operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Block data is not an object
    #[error("Embed block data should be an object, got {0}")]
    InvalidData(String),

    /// Block data has fields of the wrong type
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The pasted URL could not be resolved
    #[error("Resolution failed: {0}")]
    Resolution(#[from] embed_core::ResolveError),

    /// The service frame could not be rendered
    #[error("Frame error: {0}")]
    Frame(#[from] embed_core::FrameError),
}
