//! Embed Kit
//!
//! URL embeds for block editors. Re-exports the service matching core and
//! the block tool.
//!
//! ```
//! use embed_kit::embed_block::{EmbedBlock, EmbedTool, PasteEvent};
//! use embed_kit::embed_core::EmbedConfig;
//!
//! let tool = EmbedTool::prepare(&EmbedConfig::default());
//! let mut block = EmbedBlock::new(tool, serde_json::json!({}), false)?;
//! block.on_paste(&PasteEvent::new("youtube", "https://youtu.be/dQw4w9WgXcQ"))?;
//!
//! let saved = block.save("Never gonna give you up");
//! assert_eq!(saved.embed.as_deref(), Some("https://www.youtube.com/embed/dQw4w9WgXcQ"));
//! # Ok::<(), embed_kit::embed_block::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use embed_block;
pub use embed_core;
