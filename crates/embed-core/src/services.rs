//! Built-in service catalogue
//!
//! Video, music, social and code-sharing services that can be embedded
//! without any configuration. The table is compiled once per process and
//! handed out as a read-only [`Registry`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::registry::Registry;
use crate::rule::{IdExtractor, MatchRule};

/// Frame markup shared by most video players
const PLAYER_FRAME: &str =
    r#"<iframe style="width:100%;" height="320" frameborder="0" allowfullscreen></iframe>"#;

static DEFAULT_SERVICES: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::new();

    registry.insert(
        "vimeo",
        rule(
            r"(?:https?://)?(?:www\.)?(?:player\.)?vimeo\.co(?:.+/([^/]\d+)(?:#t=\d+)?s?$)",
            "https://player.vimeo.com/video/<%= remote_id %>?title=0&byline=0",
            r#"<iframe style="width:100%;" height="320" frameborder="0"></iframe>"#,
        )
        .with_size(580.0, 320.0),
    );

    registry.insert(
        "youtube",
        rule(
            r"(?:https?://)?(?:www\.)?(?:(?:youtu\.be/)|(?:youtube\.com)/(?:v/|u/\w/|embed/|watch))(?:(?:\?v=)?([^#&?=]*))?((?:[?&]\w*=\w*)*)",
            "https://www.youtube.com/embed/<%= remote_id %>",
            PLAYER_FRAME,
        )
        .with_size(580.0, 320.0)
        .with_extractor(IdExtractor::YouTube),
    );

    registry.insert(
        "coub",
        rule(
            r"https?://coub\.com/view/([^/?&]+)",
            "https://coub.com/embed/<%= remote_id %>",
            PLAYER_FRAME,
        )
        .with_size(580.0, 320.0),
    );

    registry.insert(
        "vine",
        rule(
            r"https?://vine\.co/v/([^/?&]+)",
            "https://vine.co/v/<%= remote_id %>/embed/simple/",
            PLAYER_FRAME,
        )
        .with_size(580.0, 320.0),
    );

    registry.insert(
        "imgur",
        rule(
            r"https?://(?:i\.)?imgur\.com.*/([a-zA-Z0-9]+)(?:\.gifv)?",
            "http://imgur.com/<%= remote_id %>/embed",
            r#"<iframe allowfullscreen="true" scrolling="no" class="imgur-embed-iframe-pub" style="height: 500px; width: 100%; border: 1px solid #000"></iframe>"#,
        )
        .with_size(540.0, 500.0),
    );

    registry.insert(
        "gfycat",
        rule(
            r"https?://gfycat\.com(?:/detail)?/([a-zA-Z]+)",
            "https://gfycat.com/ifr/<%= remote_id %>",
            r#"<iframe frameborder="0" scrolling="no" style="width:100%;" height="436" allowfullscreen></iframe>"#,
        )
        .with_size(580.0, 436.0),
    );

    registry.insert(
        "twitch-channel",
        rule(
            r"https?://www\.twitch\.tv/([^/?&]*)/?$",
            "https://player.twitch.tv/?channel=<%= remote_id %>",
            r#"<iframe frameborder="0" allowfullscreen="true" scrolling="no" height="366" style="width:100%;"></iframe>"#,
        )
        .with_size(600.0, 366.0),
    );

    registry.insert(
        "twitch-video",
        rule(
            r"https?://www\.twitch\.tv/(?:[^/?&]*/v|videos)/([0-9]*)",
            "https://player.twitch.tv/?video=v<%= remote_id %>",
            r#"<iframe frameborder="0" allowfullscreen="true" scrolling="no" height="366" style="width:100%;"></iframe>"#,
        )
        .with_size(600.0, 366.0),
    );

    registry.insert(
        "yandex-music-album",
        rule(
            r"https?://music\.yandex\.ru/album/([0-9]*)/?$",
            "https://music.yandex.ru/iframe/#album/<%= remote_id %>/",
            r#"<iframe frameborder="0" style="border:none;width:540px;height:400px;" height="400"></iframe>"#,
        )
        .with_size(540.0, 400.0),
    );

    registry.insert(
        "yandex-music-track",
        rule(
            r"https?://music\.yandex\.ru/album/([0-9]*)/track/([0-9]*)",
            "https://music.yandex.ru/iframe/#track/<%= remote_id %>/",
            r#"<iframe frameborder="0" style="border:none;width:540px;height:100px;" height="100"></iframe>"#,
        )
        .with_size(540.0, 100.0)
        .with_extractor(IdExtractor::Join("/".into())),
    );

    registry.insert(
        "yandex-music-playlist",
        rule(
            r"https?://music\.yandex\.ru/users/([^/?&]*)/playlists/([0-9]*)",
            "https://music.yandex.ru/iframe/#playlist/<%= remote_id %>/show/cover/description/",
            r#"<iframe frameborder="0" style="border:none;width:540px;height:400px;" width="540" height="400"></iframe>"#,
        )
        .with_size(540.0, 400.0)
        .with_extractor(IdExtractor::Join("/".into())),
    );

    registry.insert(
        "codepen",
        rule(
            r"https?://codepen\.io/([^/?&]*)/pen/([^/?&]*)",
            "https://codepen.io/<%= remote_id %>?height=300&theme-id=0&default-tab=css,result&embed-version=2",
            r#"<iframe height="300" scrolling="no" frameborder="no" allowtransparency="true" allowfullscreen="true" style="width: 100%;"></iframe>"#,
        )
        .with_size(600.0, 300.0)
        .with_extractor(IdExtractor::Join("/embed/".into())),
    );

    registry.insert(
        "instagram",
        rule(
            r"https?://www\.instagram\.com/p/([^/?&]+)/?",
            "https://www.instagram.com/p/<%= remote_id %>/embed",
            r#"<iframe width="400" height="505" style="margin: 0 auto;" frameborder="0" scrolling="no" allowtransparency="true"></iframe>"#,
        )
        .with_size(400.0, 505.0),
    );

    registry.insert(
        "twitter",
        rule(
            r"^https?://(?:www\.)?(?:twitter|x)\.com/([^/?&]+)/status/(\d+)",
            "https://twitframe.com/show?url=https://twitter.com/<%= remote_id %>",
            r#"<iframe width="600" height="600" style="margin: 0 auto;" frameborder="0" scrolling="no" allowtransparency="true"></iframe>"#,
        )
        .with_size(600.0, 300.0)
        .with_extractor(IdExtractor::Join("/status/".into())),
    );

    registry.insert(
        "pinterest",
        rule(
            r"https?://([^/?&]*)\.pinterest\.com/pin/([^/?&]*)/?$",
            "https://assets.pinterest.com/ext/embed.html?id=<%= remote_id %>",
            r#"<iframe scrolling="no" frameborder="no" allowtransparency="true" allowfullscreen="true" style="width: 100%; min-height: 400px; max-height: 1000px;"></iframe>"#,
        )
        .with_extractor(IdExtractor::Nth(1)),
    );

    registry.insert(
        "facebook",
        rule(
            r"https?://www\.facebook\.com/([^/?&]*)/(.*)",
            "https://www.facebook.com/plugins/post.php?href=https://www.facebook.com/<%= remote_id %>&width=500",
            r#"<iframe scrolling="no" frameborder="no" allowtransparency="true" allowfullscreen="true" style="width: 100%; min-height: 500px; max-height: 1000px;"></iframe>"#,
        )
        .with_extractor(IdExtractor::Join("/".into())),
    );

    registry.insert(
        "aparat",
        rule(
            r"(?:https?://)?(?:www\.)?aparat\.com/v/([^/?&]+)/?",
            "https://www.aparat.com/video/video/embed/videohash/<%= remote_id %>/vt/frame",
            r#"<iframe width="600" height="300" style="margin: 0 auto;" frameborder="0" scrolling="no" allowtransparency="true"></iframe>"#,
        )
        .with_size(600.0, 300.0),
    );

    registry.insert(
        "miro",
        rule(
            r"https://miro\.com/\S+(\S{12})/(\S+)?",
            "https://miro.com/app/live-embed/<%= remote_id %>",
            r#"<iframe width="700" height="500" style="margin: 0 auto;" allowfullscreen frameborder="0" scrolling="no"></iframe>"#,
        ),
    );

    registry.insert(
        "github",
        rule(
            r"https?://gist\.github\.com/([^/?&]*)/([^/?&]*)",
            r#"data:text/html;charset=utf-8,<head><base target="_blank" /></head><body><script src="https://gist.github.com/<%= remote_id %>" ></script></body>"#,
            r#"<iframe width="100%" height="350" frameborder="0" style="margin: 0 auto;"></iframe>"#,
        )
        .with_size(600.0, 300.0)
        .with_extractor(IdExtractor::JoinSuffix { separator: "/".into(), suffix: ".js".into() }),
    );

    registry
});

fn rule(pattern: &str, embed_template: &str, frame_markup: &str) -> MatchRule {
    let pattern = Regex::new(pattern).expect("built-in service pattern must compile");
    MatchRule::new(pattern, embed_template, frame_markup)
}

/// The built-in services
pub fn defaults() -> &'static Registry {
    &DEFAULT_SERVICES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;

    fn embed_for(service: &str, url: &str) -> String {
        resolve(defaults(), service, url).unwrap().embed
    }

    #[test]
    fn test_catalogue_contents() {
        let registry = defaults();
        assert_eq!(registry.len(), 19);
        for name in ["youtube", "vimeo", "codepen", "github", "twitch-video", "miro"] {
            assert!(registry.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_every_template_has_placeholder() {
        for (name, rule) in defaults().iter() {
            assert!(
                rule.embed_template.contains(crate::rule::REMOTE_ID_PLACEHOLDER),
                "{} has no placeholder",
                name
            );
            assert!(rule.frame_markup.starts_with("<iframe"), "{} frame", name);
        }
    }

    #[test]
    fn test_youtube_urls() {
        assert_eq!(
            embed_for("youtube", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_for("youtube", "https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_for("youtube", "https://www.youtube.com/embed/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_for("youtube", "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?start=42"
        );
        assert_eq!(
            embed_for("youtube", "https://www.youtube.com/watch?v=dQw4w9WgXcQ&feature=share"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_vimeo_url() {
        assert_eq!(
            embed_for("vimeo", "https://vimeo.com/289836809"),
            "https://player.vimeo.com/video/289836809?title=0&byline=0"
        );
    }

    #[test]
    fn test_codepen_url() {
        assert_eq!(
            embed_for("codepen", "https://codepen.io/ivanzusko/pen/ZXYrwx"),
            "https://codepen.io/ivanzusko/embed/ZXYrwx?height=300&theme-id=0&default-tab=css,result&embed-version=2"
        );
    }

    #[test]
    fn test_gist_url() {
        let embed = embed_for("github", "https://gist.github.com/userdude/2a4e1f2fa3b0b1c5c5a8");
        assert!(embed.contains("https://gist.github.com/userdude/2a4e1f2fa3b0b1c5c5a8.js"));
    }

    #[test]
    fn test_twitch_urls() {
        assert_eq!(
            embed_for("twitch-channel", "https://www.twitch.tv/ninja"),
            "https://player.twitch.tv/?channel=ninja"
        );
        assert_eq!(
            embed_for("twitch-video", "https://www.twitch.tv/videos/315468440"),
            "https://player.twitch.tv/?video=v315468440"
        );
    }

    #[test]
    fn test_yandex_track_joins_album_and_track() {
        assert_eq!(
            embed_for("yandex-music-track", "https://music.yandex.ru/album/5643859/track/42662275"),
            "https://music.yandex.ru/iframe/#track/5643859/42662275/"
        );
    }

    #[test]
    fn test_twitter_status() {
        assert_eq!(
            embed_for("twitter", "https://twitter.com/codex_team/status/1202295536826630145"),
            "https://twitframe.com/show?url=https://twitter.com/codex_team/status/1202295536826630145"
        );
    }

    #[test]
    fn test_pinterest_uses_second_group() {
        assert_eq!(
            embed_for("pinterest", "https://www.pinterest.com/pin/12345678/"),
            "https://assets.pinterest.com/ext/embed.html?id=12345678"
        );
    }

    #[test]
    fn test_sizes() {
        let youtube = defaults().get("youtube").unwrap();
        assert_eq!(youtube.frame_width, Some(580.0));
        assert_eq!(youtube.frame_height, Some(320.0));

        let miro = defaults().get("miro").unwrap();
        assert_eq!(miro.frame_width, None);
    }
}
