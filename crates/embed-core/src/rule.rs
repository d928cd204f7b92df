//! Match rules for embeddable services
//!
//! A [`MatchRule`] is the recognition and rendering recipe for one service:
//! the URL pattern, the embed URL template, the frame markup and an optional
//! resource id extractor. [`RuleDraft`] is the loosely-typed form that comes
//! from user configuration before it has been validated.

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Token replaced by the resolved resource id inside embed templates
pub const REMOTE_ID_PLACEHOLDER: &str = "<%= remote_id %>";

/// Signature of a programmatic id extractor
///
/// Receives the captured groups in order (group 0 excluded). Groups that did
/// not participate in the match are `None`.
pub type ExtractFn = dyn Fn(&[Option<&str>]) -> Option<String> + Send + Sync;

/// Strategy for turning captured groups into a resource id
///
/// The declarative variants can be written in JSON configuration:
///
/// ```json
/// "first"
/// { "nth": 1 }
/// { "join": "/" }
/// { "joinSuffix": { "separator": "/", "suffix": ".js" } }
/// "youtube"
/// ```
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdExtractor {
    /// First captured group
    First,
    /// Captured group at the given index (0 is the first capture)
    Nth(usize),
    /// All groups joined with a separator
    Join(String),
    /// All groups joined with a separator, followed by a suffix
    JoinSuffix {
        /// Separator placed between groups
        separator: String,
        /// Text appended after the joined groups
        suffix: String,
    },
    /// Video id plus whitelisted playback parameters
    #[serde(rename = "youtube")]
    YouTube,
    /// Arbitrary closure supplied by the embedding application
    #[serde(skip)]
    Custom(Arc<ExtractFn>),
}

impl IdExtractor {
    /// Wrap a closure as an extractor
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Option<&str>]) -> Option<String> + Send + Sync + 'static,
    {
        IdExtractor::Custom(Arc::new(f))
    }

    /// Run the extractor over the captured groups
    pub fn extract(&self, groups: &[Option<&str>]) -> Option<String> {
        match self {
            IdExtractor::First => groups.first().copied().flatten().map(str::to_string),
            IdExtractor::Nth(index) => groups.get(*index).copied().flatten().map(str::to_string),
            IdExtractor::Join(separator) => Some(join_groups(groups, separator)),
            IdExtractor::JoinSuffix { separator, suffix } => {
                Some(format!("{}{}", join_groups(groups, separator), suffix))
            }
            IdExtractor::YouTube => youtube_id(groups),
            IdExtractor::Custom(f) => f(groups),
        }
    }
}

impl fmt::Debug for IdExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdExtractor::First => f.write_str("First"),
            IdExtractor::Nth(index) => f.debug_tuple("Nth").field(index).finish(),
            IdExtractor::Join(separator) => f.debug_tuple("Join").field(separator).finish(),
            IdExtractor::JoinSuffix { separator, suffix } => f
                .debug_struct("JoinSuffix")
                .field("separator", separator)
                .field("suffix", suffix)
                .finish(),
            IdExtractor::YouTube => f.write_str("YouTube"),
            IdExtractor::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for IdExtractor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IdExtractor::First, IdExtractor::First) => true,
            (IdExtractor::Nth(a), IdExtractor::Nth(b)) => a == b,
            (IdExtractor::Join(a), IdExtractor::Join(b)) => a == b,
            (
                IdExtractor::JoinSuffix { separator: a, suffix: x },
                IdExtractor::JoinSuffix { separator: b, suffix: y },
            ) => a == b && x == y,
            (IdExtractor::YouTube, IdExtractor::YouTube) => true,
            (IdExtractor::Custom(a), IdExtractor::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn join_groups(groups: &[Option<&str>], separator: &str) -> String {
    groups.iter().map(|g| g.unwrap_or_default()).collect::<Vec<_>>().join(separator)
}

/// Parameters carried over from a YouTube URL into the embed URL
fn youtube_param(name: &str) -> Option<&'static str> {
    match name {
        "start" | "t" | "time_continue" => Some("start"),
        "end" => Some("end"),
        "list" => Some("list"),
        _ => None,
    }
}

fn youtube_id(groups: &[Option<&str>]) -> Option<String> {
    let mut id = groups.first().copied().flatten().filter(|id| !id.is_empty());
    let params = groups.get(1).copied().flatten().unwrap_or_default();

    if params.is_empty() {
        return id.map(str::to_string);
    }

    // Drop the leading `?` or `&`
    let mut chars = params.chars();
    chars.next();

    let mut kept = Vec::new();
    for param in chars.as_str().split('&') {
        let (name, value) = param.split_once('=').unwrap_or((param, ""));

        if id.is_none() && name == "v" {
            id = Some(value);
            continue;
        }

        let Some(mapped) = youtube_param(name) else {
            continue;
        };

        // Personal playlists (liked, mixes, favourites) cannot be embedded
        if value == "LL" || value.starts_with("RDMM") || value.starts_with("FL") {
            continue;
        }

        kept.push(format!("{}={}", mapped, value));
    }

    let id = id?;
    if kept.is_empty() {
        return Some(id.to_string());
    }
    Some(format!("{}?{}", id, kept.join("&")))
}

/// A validated recognition and rendering recipe for one service
#[derive(Debug, Clone)]
pub struct MatchRule {
    /// Pattern tested against candidate URLs
    pub pattern: Regex,
    /// Embed URL containing [`REMOTE_ID_PLACEHOLDER`]
    pub embed_template: String,
    /// HTML fragment whose root element is the frame
    pub frame_markup: String,
    /// Intrinsic frame height hint
    pub frame_height: Option<f64>,
    /// Intrinsic frame width hint
    pub frame_width: Option<f64>,
    /// Id extractor; the first captured group is used when absent
    pub extract_id: Option<IdExtractor>,
}

impl MatchRule {
    /// Create a rule without size hints or a custom extractor
    pub fn new(
        pattern: Regex,
        embed_template: impl Into<String>,
        frame_markup: impl Into<String>,
    ) -> Self {
        Self {
            pattern,
            embed_template: embed_template.into(),
            frame_markup: frame_markup.into(),
            frame_height: None,
            frame_width: None,
            extract_id: None,
        }
    }

    /// Set the intrinsic frame size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.frame_width = Some(width);
        self.frame_height = Some(height);
        self
    }

    /// Set the id extractor
    pub fn with_extractor(mut self, extractor: IdExtractor) -> Self {
        self.extract_id = Some(extractor);
        self
    }

    /// Resource id for the given captured groups
    pub fn resource_id(&self, groups: &[Option<&str>]) -> Option<String> {
        match &self.extract_id {
            Some(extractor) => extractor.extract(groups),
            None => IdExtractor::First.extract(groups),
        }
    }

    /// Substitute the resource id into every placeholder of the template
    pub fn embed_url(&self, resource_id: &str) -> String {
        self.embed_template.replace(REMOTE_ID_PLACEHOLDER, resource_id)
    }

    /// Overlay a validated user rule on top of this one
    ///
    /// Required fields always come from the override; optional fields only
    /// when the override sets them.
    pub fn merge(&mut self, overlay: MatchRule) {
        self.pattern = overlay.pattern;
        self.embed_template = overlay.embed_template;
        self.frame_markup = overlay.frame_markup;
        if overlay.frame_height.is_some() {
            self.frame_height = overlay.frame_height;
        }
        if overlay.frame_width.is_some() {
            self.frame_width = overlay.frame_width;
        }
        if overlay.extract_id.is_some() {
            self.extract_id = overlay.extract_id;
        }
    }
}

impl PartialEq for MatchRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str()
            && self.embed_template == other.embed_template
            && self.frame_markup == other.frame_markup
            && self.frame_height == other.frame_height
            && self.frame_width == other.frame_width
            && self.extract_id == other.extract_id
    }
}

/// Extractor as written in configuration
///
/// Anything that is not a recognised extractor shape is kept as `Opaque` so
/// that validation, not deserialization, decides its fate.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExtractorDraft {
    /// A usable extractor
    Declared(IdExtractor),
    /// Some other JSON value
    Opaque(serde_json::Value),
}

/// Unvalidated rule from user configuration
///
/// Field names follow the host configuration format (`regex`, `embedUrl`,
/// `html`, `height`, `width`, `id`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    /// Pattern source
    #[serde(default)]
    pub regex: Option<String>,
    /// Embed URL template
    #[serde(default)]
    pub embed_url: Option<String>,
    /// Frame markup
    #[serde(default)]
    pub html: Option<String>,
    /// Frame height
    #[serde(default)]
    pub height: Option<f64>,
    /// Frame width
    #[serde(default)]
    pub width: Option<f64>,
    /// Id extractor
    #[serde(default)]
    pub id: Option<ExtractorDraft>,
}

impl RuleDraft {
    /// Start an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pattern source
    pub fn regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }

    /// Set the embed URL template
    pub fn embed_url(mut self, embed_url: impl Into<String>) -> Self {
        self.embed_url = Some(embed_url.into());
        self
    }

    /// Set the frame markup
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Set the frame height
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the frame width
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the id extractor
    pub fn id(mut self, extractor: IdExtractor) -> Self {
        self.id = Some(ExtractorDraft::Declared(extractor));
        self
    }

    /// Convert into a rule, or `None` if the draft is not valid
    pub fn into_rule(self) -> Option<MatchRule> {
        if !crate::validator::is_valid(&self) {
            return None;
        }

        let pattern = Regex::new(self.regex.as_deref()?).ok()?;
        let extract_id = match self.id {
            Some(ExtractorDraft::Declared(extractor)) => Some(extractor),
            Some(ExtractorDraft::Opaque(_)) => return None,
            None => None,
        };

        Some(MatchRule {
            pattern,
            embed_template: self.embed_url?,
            frame_markup: self.html?,
            frame_height: self.height,
            frame_width: self.width,
            extract_id,
        })
    }
}
