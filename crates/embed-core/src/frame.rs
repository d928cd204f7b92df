//! Frame markup rendering
//!
//! A rule's `frame_markup` is a bare element such as
//! `<iframe height="320" frameborder="0"></iframe>`. Rendering points the
//! root element at the resolved embed URL.

use thiserror::Error;

use crate::rule::MatchRule;

/// Errors that can occur while rendering a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The markup has no opening element tag
    #[error("Frame markup has no root element: {0}")]
    NoRootElement(String),
}

/// Result type for frame rendering
pub type Result<T> = std::result::Result<T, FrameError>;

/// Render the rule's frame with its `src` set to `embed`
///
/// The attribute is inserted right after the root tag name. Any `src` already
/// present in the markup is left in place and ends up second, so browsers use
/// the inserted one.
pub fn render_frame(rule: &MatchRule, embed: &str) -> Result<String> {
    render_markup(&rule.frame_markup, embed)
}

/// Render arbitrary frame markup with its `src` set to `embed`
pub fn render_markup(markup: &str, embed: &str) -> Result<String> {
    let name_end = root_tag_name_end(markup)
        .ok_or_else(|| FrameError::NoRootElement(markup.to_string()))?;

    let src = html_escape::encode_double_quoted_attribute(embed);

    let mut rendered = String::with_capacity(markup.len() + src.len() + 8);
    rendered.push_str(&markup[..name_end]);
    rendered.push_str(" src=\"");
    rendered.push_str(&src);
    rendered.push('"');
    rendered.push_str(&markup[name_end..]);
    Ok(rendered)
}

/// Byte offset just past the tag name of the first opening element
fn root_tag_name_end(markup: &str) -> Option<usize> {
    let bytes = markup.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = markup[search_from..].find('<') {
        let open = search_from + offset;
        let name_start = open + 1;

        if bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
            let name_len = bytes[name_start..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
                .count();
            return Some(name_start + name_len);
        }

        search_from = name_start;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_src_inserted_after_tag_name() {
        let rendered = render_markup(
            r#"<iframe style="width:100%;" height="320"></iframe>"#,
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        )
        .unwrap();
        assert_eq!(
            rendered,
            r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ" style="width:100%;" height="320"></iframe>"#
        );
    }

    #[test]
    fn test_leading_whitespace_and_comments() {
        let rendered = render_markup("  <!-- frame -->\n<iframe></iframe>", "https://x/1").unwrap();
        assert_eq!(rendered, "  <!-- frame -->\n<iframe src=\"https://x/1\"></iframe>");
    }

    #[test]
    fn test_src_is_escaped() {
        let rendered = render_markup(
            "<iframe></iframe>",
            r#"data:text/html,<script src="https://gist.github.com/a/b.js"></script>"#,
        )
        .unwrap();
        assert!(!rendered.contains(r#"src="https://gist"#));
        assert!(rendered.contains("&quot;https://gist.github.com/a/b.js&quot;"));
    }

    #[test]
    fn test_no_root_element() {
        assert!(matches!(render_markup("just text", "x"), Err(FrameError::NoRootElement(_))));
        assert!(matches!(render_markup("</iframe>", "x"), Err(FrameError::NoRootElement(_))));
    }

    #[test]
    fn test_render_frame_uses_rule_markup() {
        let rule = MatchRule::new(
            regex::Regex::new(r"v/(\w+)").unwrap(),
            "https://x/<%= remote_id %>",
            r#"<iframe height="300"></iframe>"#,
        );
        let rendered = render_frame(&rule, "https://x/abc").unwrap();
        assert_eq!(rendered, r#"<iframe src="https://x/abc" height="300"></iframe>"#);
    }
}
