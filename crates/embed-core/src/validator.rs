//! Structural validation of user-supplied service rules

use regex::Regex;

use crate::rule::{ExtractorDraft, RuleDraft};

/// Check a user-supplied rule before it may join a registry
///
/// A draft is valid when it has a compilable `regex`, non-empty `embedUrl`
/// and `html`, a usable `id` extractor if one is given, and finite `height`
/// and `width` if those are given. Never fails; invalid drafts just return
/// `false`.
pub fn is_valid(draft: &RuleDraft) -> bool {
    let pattern_ok = draft.regex.as_deref().is_some_and(|source| Regex::new(source).is_ok());
    let template_ok = draft.embed_url.as_deref().is_some_and(|s| !s.is_empty());
    let markup_ok = draft.html.as_deref().is_some_and(|s| !s.is_empty());
    let extractor_ok = !matches!(draft.id, Some(ExtractorDraft::Opaque(_)));
    let height_ok = draft.height.map_or(true, f64::is_finite);
    let width_ok = draft.width.map_or(true, f64::is_finite);

    pattern_ok && template_ok && markup_ok && extractor_ok && height_ok && width_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::IdExtractor;

    fn valid_draft() -> RuleDraft {
        RuleDraft::new()
            .regex(r"https?://example\.com/watch/(\w+)")
            .embed_url("https://example.com/embed/<%= remote_id %>")
            .html(r#"<iframe style="width:100%;" height="320" frameborder="0"></iframe>"#)
    }

    #[test]
    fn test_minimal_rule_is_valid() {
        assert!(is_valid(&valid_draft()));
    }

    #[test]
    fn test_full_rule_is_valid() {
        let draft = valid_draft().height(320.0).width(580.0).id(IdExtractor::Join("/".into()));
        assert!(is_valid(&draft));
    }

    #[test]
    fn test_missing_required_fields() {
        let mut draft = valid_draft();
        draft.regex = None;
        assert!(!is_valid(&draft));

        let mut draft = valid_draft();
        draft.embed_url = None;
        assert!(!is_valid(&draft));

        let mut draft = valid_draft();
        draft.html = None;
        assert!(!is_valid(&draft));
    }

    #[test]
    fn test_empty_strings_rejected() {
        assert!(!is_valid(&valid_draft().embed_url("")));
        assert!(!is_valid(&valid_draft().html("")));
    }

    #[test]
    fn test_uncompilable_pattern_rejected() {
        assert!(!is_valid(&valid_draft().regex("(unclosed")));
    }

    #[test]
    fn test_non_finite_sizes_rejected() {
        assert!(!is_valid(&valid_draft().height(f64::NAN)));
        assert!(!is_valid(&valid_draft().width(f64::INFINITY)));
        assert!(!is_valid(&valid_draft().height(f64::NEG_INFINITY)));
    }

    #[test]
    fn test_unusable_extractor_rejected() {
        let mut draft = valid_draft();
        draft.id = Some(ExtractorDraft::Opaque(serde_json::json!("not-a-function")));
        assert!(!is_valid(&draft));
    }

    #[test]
    fn test_validates_drafts_from_json() {
        let draft: RuleDraft = serde_json::from_value(serde_json::json!({
            "regex": "https://coub\\.com/view/([^/?&]+)",
            "embedUrl": "https://coub.com/embed/<%= remote_id %>",
            "html": "<iframe></iframe>",
            "height": 320,
            "width": 580,
            "id": { "nth": 0 }
        }))
        .unwrap();
        assert!(is_valid(&draft));
    }
}
