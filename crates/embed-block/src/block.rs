//! A single embed block
//!
//! Lifecycle:
//! - constructed from saved data (or `{}` for a fresh block)
//! - a routed paste resolves the URL and replaces the embed fields
//! - the preview loads until the readiness handle fires
//! - saving pulls the live caption from the host and returns the record

use embed_core::{render_frame, ResolveError};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::host::{CaptionSource, PasteEvent};
use crate::readiness::{self, Readiness, ReadyHandle, ReadySignal, QUIET_PERIOD};
use crate::record::EmbedRecord;
use crate::tool::EmbedTool;
use crate::{Error, Result};

/// What the host should display for a block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockView {
    /// No embed yet; show the input prompt
    Empty,
    /// Rendered frame with its caption
    Preview {
        /// Frame markup pointing at the embed URL
        frame: String,
        /// Caption text
        caption: String,
        /// Whether the caption may be edited
        caption_editable: bool,
        /// Still waiting for the frame to load
        loading: bool,
    },
    /// The last paste could not be resolved; keep the input usable
    Failed {
        /// URL that failed
        url: String,
        /// Why it failed
        reason: ResolveError,
    },
}

/// State of one embed block
#[derive(Debug)]
pub struct EmbedBlock {
    tool: Arc<EmbedTool>,
    data: EmbedRecord,
    read_only: bool,
    loading: bool,
    failure: Option<(String, ResolveError)>,
    ready: Option<ReadyHandle>,
}

impl EmbedBlock {
    /// Create a block from the host's saved data
    ///
    /// `null` and `{}` create an empty block; any other non-object value is
    /// rejected.
    pub fn new(tool: Arc<EmbedTool>, data: serde_json::Value, read_only: bool) -> Result<Self> {
        let mut block = Self {
            tool,
            data: EmbedRecord::default(),
            read_only,
            loading: false,
            failure: None,
            ready: None,
        };

        if !data.is_null() {
            block.set_data(&data)?;
        }

        Ok(block)
    }

    /// Current record
    pub fn data(&self) -> &EmbedRecord {
        &self.data
    }

    /// Whether the block is read-only
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Assign block data; only supplied fields change
    pub fn set_data(&mut self, value: &serde_json::Value) -> Result<()> {
        self.data.update(value)?;
        if !self.data.is_empty() {
            self.failure = None;
            self.loading = true;
        }
        Ok(())
    }

    /// Handle a paste the host routed to this tool
    ///
    /// On failure the block data is left untouched and the view switches to
    /// [`BlockView::Failed`].
    pub fn on_paste(&mut self, event: &PasteEvent) -> Result<&EmbedRecord> {
        match self.tool.resolve(&event.key, &event.data) {
            Ok(descriptor) => {
                debug!(service = %descriptor.service, embed = %descriptor.embed, "Paste resolved");
                self.data.apply_descriptor(descriptor);
                self.failure = None;
                self.loading = true;
                self.ready = None;
                Ok(&self.data)
            }
            Err(err) => {
                warn!(service = %event.key, error = %err, "Paste could not be resolved");
                self.failure = Some((event.data.clone(), err.clone()));
                Err(Error::Resolution(err))
            }
        }
    }

    /// What to display
    pub fn view(&self) -> Result<BlockView> {
        if let Some((url, reason)) = &self.failure {
            return Ok(BlockView::Failed { url: url.clone(), reason: reason.clone() });
        }

        let (Some(service), Some(embed)) = (&self.data.service, &self.data.embed) else {
            return Ok(BlockView::Empty);
        };

        let rule = self
            .tool
            .registry()
            .get(service)
            .ok_or_else(|| ResolveError::UnknownService(service.clone()))?;

        Ok(BlockView::Preview {
            frame: render_frame(rule, embed)?,
            caption: self.data.caption.clone(),
            caption_editable: !self.read_only,
            loading: self.loading,
        })
    }

    /// Start tracking the preview's readiness
    ///
    /// The returned signal goes to the surface that hosts the frame. A newer
    /// call replaces any pending handle.
    pub fn begin_preview(&mut self) -> ReadySignal {
        let (signal, handle) = readiness::channel(QUIET_PERIOD);
        self.ready = Some(handle);
        self.loading = true;
        signal
    }

    /// Wait for the preview to be ready and leave the loading state
    pub async fn wait_until_ready(&mut self) -> Readiness {
        let readiness = match self.ready.take() {
            Some(handle) => handle.wait().await,
            None => Readiness::Abandoned,
        };
        self.loading = false;
        readiness
    }

    /// Whether the preview is still loading
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Refresh the caption from the host and return the record to persist
    pub fn save<C: CaptionSource + ?Sized>(&mut self, captions: &C) -> EmbedRecord {
        self.data.caption = captions.caption().unwrap_or_default();
        self.data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockCaptionSource;
    use embed_core::EmbedConfig;
    use serde_json::json;

    fn tool() -> Arc<EmbedTool> {
        EmbedTool::prepare(&EmbedConfig::default())
    }

    #[test]
    fn test_new_empty_block() {
        let block = EmbedBlock::new(tool(), json!({}), false).unwrap();
        assert!(block.data().is_empty());
        assert_eq!(block.view().unwrap(), BlockView::Empty);

        let block = EmbedBlock::new(tool(), serde_json::Value::Null, false).unwrap();
        assert!(block.data().is_empty());
    }

    #[test]
    fn test_new_rejects_non_object() {
        let err = EmbedBlock::new(tool(), json!("https://youtu.be/x"), false).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_restore_saved_block() {
        let block = EmbedBlock::new(
            tool(),
            json!({
                "service": "coub",
                "source": "https://coub.com/view/1czcdf",
                "embed": "https://coub.com/embed/1czcdf",
                "width": 580,
                "height": 320,
                "caption": "Cat"
            }),
            true,
        )
        .unwrap();

        match block.view().unwrap() {
            BlockView::Preview { frame, caption, caption_editable, loading } => {
                assert!(frame.contains(r#"src="https://coub.com/embed/1czcdf""#));
                assert_eq!(caption, "Cat");
                assert!(!caption_editable);
                assert!(loading);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_paste_resolves_youtube() {
        let mut block = EmbedBlock::new(tool(), json!({}), false).unwrap();
        let record = block
            .on_paste(&PasteEvent::new("youtube", "https://youtube.com/watch?v=dQw4w9WgXcQ"))
            .unwrap();

        assert_eq!(record.service.as_deref(), Some("youtube"));
        assert_eq!(record.source.as_deref(), Some("https://youtube.com/watch?v=dQw4w9WgXcQ"));
        assert_eq!(record.embed.as_deref(), Some("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert_eq!(record.width, Some(580.0));
        assert_eq!(record.height, Some(320.0));
    }

    #[test]
    fn test_failed_paste_keeps_data_and_reports() {
        let mut block = EmbedBlock::new(tool(), json!({}), false).unwrap();

        let err = block.on_paste(&PasteEvent::new("nope", "https://example.com")).unwrap_err();
        assert!(matches!(err, Error::Resolution(ResolveError::UnknownService(_))));
        assert!(block.data().is_empty());
        assert!(matches!(block.view().unwrap(), BlockView::Failed { .. }));

        let err = block.on_paste(&PasteEvent::new("vimeo", "https://example.com")).unwrap_err();
        assert!(matches!(err, Error::Resolution(ResolveError::NoMatch { .. })));
    }

    #[test]
    fn test_successful_paste_clears_failure() {
        let mut block = EmbedBlock::new(tool(), json!({}), false).unwrap();
        let _ = block.on_paste(&PasteEvent::new("vimeo", "not a url"));
        block.on_paste(&PasteEvent::new("vimeo", "https://vimeo.com/289836809")).unwrap();

        assert!(matches!(block.view().unwrap(), BlockView::Preview { .. }));
    }

    #[test]
    fn test_view_for_service_missing_from_registry() {
        let tool = EmbedTool::prepare(&EmbedConfig::default().enable("vimeo"));
        let block = EmbedBlock::new(
            tool,
            json!({ "service": "coub", "source": "s", "embed": "https://coub.com/embed/x" }),
            false,
        )
        .unwrap();

        assert!(matches!(
            block.view(),
            Err(Error::Resolution(ResolveError::UnknownService(ref s))) if s == "coub"
        ));
    }

    #[test]
    fn test_repaste_replaces_sizes() {
        let mut block = EmbedBlock::new(tool(), json!({}), false).unwrap();
        block.on_paste(&PasteEvent::new("youtube", "https://youtu.be/dQw4w9WgXcQ")).unwrap();
        assert_eq!(block.data().width, Some(580.0));

        let record = block
            .on_paste(&PasteEvent::new("pinterest", "https://www.pinterest.com/pin/12345678/"))
            .unwrap();

        assert_eq!(record.service.as_deref(), Some("pinterest"));
        assert_eq!(record.width, None);
        assert_eq!(record.height, None);
    }

    #[test]
    fn test_save_reads_caption() {
        let mut block = EmbedBlock::new(tool(), json!({}), false).unwrap();
        block.on_paste(&PasteEvent::new("coub", "https://coub.com/view/1czcdf")).unwrap();

        let mut captions = MockCaptionSource::new();
        captions.expect_caption().times(1).returning(|| Some("  Exact <b>caption</b> ".into()));

        let saved = block.save(&captions);
        assert_eq!(saved.caption, "  Exact <b>caption</b> ");
        assert_eq!(saved.service.as_deref(), Some("coub"));
    }

    #[test]
    fn test_save_without_caption_element() {
        let mut block = EmbedBlock::new(tool(), json!({ "caption": "old" }), false).unwrap();

        let mut captions = MockCaptionSource::new();
        captions.expect_caption().returning(|| None);

        assert_eq!(block.save(&captions).caption, "");
    }

    #[test]
    fn test_paste_keeps_caption() {
        let mut block = EmbedBlock::new(tool(), json!({ "caption": "mine" }), false).unwrap();
        block.on_paste(&PasteEvent::new("coub", "https://coub.com/view/abc")).unwrap();
        assert_eq!(block.data().caption, "mine");
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_leaves_loading_state() {
        let mut block = EmbedBlock::new(tool(), json!({}), false).unwrap();
        block.on_paste(&PasteEvent::new("coub", "https://coub.com/view/abc")).unwrap();

        let signal = block.begin_preview();
        assert!(block.is_loading());

        signal.activity();
        let readiness = block.wait_until_ready().await;

        assert_eq!(readiness, Readiness::Settled);
        assert!(!block.is_loading());
        match block.view().unwrap() {
            BlockView::Preview { loading, .. } => assert!(!loading),
            other => panic!("unexpected view {:?}", other),
        }
        drop(signal);
    }
}
