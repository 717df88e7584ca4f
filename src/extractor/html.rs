//! Best-effort video extraction from a fetched Facebook page
//!
//! Facebook inlines player configuration as JSON inside `<script>` blocks.
//! The keys carrying direct MP4 links have changed names many times, so the
//! extractor walks an ordered table of known keys (HD first), then the
//! `og:video` meta tags, and falls back to a raw scan for any absolute video
//! URL when none of them match. Page metadata is read from the parsed DOM.

use crate::extractor::models::{
    Provenance, VideoMetadata, VideoQuality, VideoResult, MAX_QUALITIES, MAX_TITLE_LEN,
};
use crate::utils::format::{format_duration, truncate_chars};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

pub const DEFAULT_TITLE: &str = "Facebook Video";

/// Placeholder thumbnail in Facebook blue (#1877f2)
pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://via.placeholder.com/400x300/1877f2/ffffff?text=Facebook+Video";

const MAX_DESCRIPTION_LEN: usize = 200;
const UNKNOWN_SIZE: &str = "Unknown size";
const UNKNOWN_DURATION: &str = "--:--";

/// Markers that identify a direct video file URL, with their MIME type
const VIDEO_MARKERS: &[(&str, &str)] = &[
    (".mp4", "video/mp4"),
    (".webm", "video/webm"),
    (".m4v", "video/mp4"),
    (".mov", "video/quicktime"),
];

/// Substrings that mark a candidate as a placeholder rather than a real rendition
const PLACEHOLDER_MARKERS: &[&str] = &["placeholder", "example.com", "sample-videos.com"];

/// Known JSON keys carrying direct video URLs, most preferred first
const URL_KEYS: &[&str] = &[
    "browser_native_hd_url",
    "playable_url_quality_hd",
    "hd_src_no_ratelimit",
    "hd_src",
    "browser_native_sd_url",
    "playable_url",
    "sd_src_no_ratelimit",
    "sd_src",
];

/// og:video properties; these rank below every JSON key
const OG_VIDEO_PROPS: &[&str] = &["og:video:secure_url", "og:video:url", "og:video"];

static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    URL_KEYS
        .iter()
        .map(|key| {
            Regex::new(&format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)+)""#, key))
                .expect("valid video key pattern")
        })
        .collect()
});

// A backslash only continues the URL as part of `\/` or a `\uXXXX` escape,
// so double-escaped JSON (`\"https:\/\/...\"`) ends cleanly before `\"`.
static RAW_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?:(?:\\?/){2}(?:[^\s"'<>\\]|\\/|\\u[0-9a-fA-F]{4})+"#)
        .expect("valid raw url pattern")
});

static DURATION_MS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""playable_duration_in_ms"\s*:\s*(\d+)"#).expect("valid duration pattern")
});

static SITE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[|\-–]\s*facebook\s*$").expect("valid suffix pattern")
});

static OG_VIDEO: LazyLock<Vec<Selector>> =
    LazyLock::new(|| OG_VIDEO_PROPS.iter().map(|p| meta_selector(p)).collect());
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| meta_selector("og:title"));
static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| meta_selector("og:image"));
static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| meta_selector("og:description"));
static OG_DURATION: LazyLock<Selector> = LazyLock::new(|| meta_selector("og:video:duration"));
static TITLE_TAG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

/// `<meta property="{prop}">` or `<meta name="{prop}">`
fn meta_selector(prop: &str) -> Selector {
    Selector::parse(&format!(r#"meta[property="{0}"], meta[name="{0}"]"#, prop))
        .expect("valid meta selector")
}

/// Every non-empty `content` value matching the selector, in document order
fn meta_contents<'a>(document: &'a Html, selector: &'a Selector) -> impl Iterator<Item = &'a str> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    meta_contents(document, selector).next().map(ToString::to_string)
}

/// Extract video information from a page.
///
/// Returns `None` when no video URL could be found; this is the signal to
/// move on to the next resolution stage, not an error.
pub fn extract(html: &str) -> Option<VideoResult> {
    let document = Html::parse_document(html);
    let urls = collect_video_urls(html, &document);
    if urls.is_empty() {
        return None;
    }

    let title = title_from(&document);
    let qualities = urls
        .into_iter()
        .enumerate()
        .map(|(i, (url, mime))| {
            let label = if i == 0 { "HD" } else { "SD" };
            VideoQuality::new(&title, label, url, UNKNOWN_SIZE, mime)
        })
        .collect();

    Some(VideoResult {
        thumbnail_url: meta_content(&document, &OG_IMAGE)
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
        duration_description: extract_duration(html, &document),
        qualities,
        metadata: VideoMetadata {
            views_description: "Unknown".to_string(),
            upload_date_description: "Unknown".to_string(),
            source_name: "Facebook".to_string(),
            description: meta_content(&document, &OG_DESCRIPTION)
                .map(|d| truncate_chars(&d, MAX_DESCRIPTION_LEN)),
        },
        title,
        source: Provenance::Scraped,
    })
}

/// Ordered, de-duplicated candidate URLs with their MIME types, at most [`MAX_QUALITIES`]
pub fn find_video_urls(html: &str) -> Vec<(String, &'static str)> {
    collect_video_urls(html, &Html::parse_document(html))
}

fn collect_video_urls(html: &str, document: &Html) -> Vec<(String, &'static str)> {
    let mut found: Vec<(String, &'static str)> = Vec::new();

    for re in URL_PATTERNS.iter() {
        for caps in re.captures_iter(html) {
            if push_candidate(&mut found, &caps[1]) {
                return found;
            }
        }
    }

    for selector in OG_VIDEO.iter() {
        for content in meta_contents(document, selector) {
            if push_candidate(&mut found, content) {
                return found;
            }
        }
    }

    if found.is_empty() {
        for m in RAW_URL.find_iter(html) {
            if push_candidate(&mut found, m.as_str()) {
                break;
            }
        }
    }

    found
}

/// Returns true once the list is full
fn push_candidate(found: &mut Vec<(String, &'static str)>, raw: &str) -> bool {
    let url = decode_video_url(raw);
    if let Some(mime) = video_mime(&url) {
        if !is_placeholder(&url) && !found.iter().any(|(u, _)| *u == url) {
            found.push((url, mime));
        }
    }
    found.len() >= MAX_QUALITIES
}

fn video_mime(url: &str) -> Option<&'static str> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return None;
    }
    let lower = url.to_ascii_lowercase();
    VIDEO_MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
        .map(|(_, mime)| *mime)
}

fn is_placeholder(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

/// Reverse the escaping used for URLs embedded in inline JSON, then percent-decode
pub fn decode_video_url(raw: &str) -> String {
    let unescaped = raw
        .replace("\\/", "/")
        .replace("\\u0025", "%")
        .replace("\\u003d", "=")
        .replace("\\u003D", "=")
        .replace("\\u0026", "&")
        .replace("&amp;", "&");
    match urlencoding::decode(&unescaped) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unescaped,
    }
}

/// og:title, else `<title>` without the site suffix, else the default; max 100 chars
pub fn extract_title(html: &str) -> String {
    title_from(&Html::parse_document(html))
}

fn title_from(document: &Html) -> String {
    let title = meta_content(document, &OG_TITLE)
        .or_else(|| {
            document
                .select(&TITLE_TAG)
                .next()
                .map(|el| el.text().collect::<String>())
                .map(|t| SITE_SUFFIX.replace(t.trim(), "").trim().to_string())
                .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("facebook"))
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    truncate_chars(&title, MAX_TITLE_LEN)
}

fn extract_duration(html: &str, document: &Html) -> String {
    let from_ms = DURATION_MS
        .captures(html)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(|ms| ms / 1000);
    let from_meta = || meta_content(document, &OG_DURATION).and_then(|s| s.parse::<u64>().ok());

    from_ms
        .or_else(from_meta)
        .map(format_duration)
        .unwrap_or_else(|| UNKNOWN_DURATION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PAGE: &str = r#"<html><head>
<title>Funny cat compilation | Facebook</title>
<meta property="og:title" content="Cat &amp; Dog" />
<meta property="og:image" content="https://scontent.xx.fbcdn.net/thumb.jpg?a=1&amp;b=2" />
<meta content="A very long description" property="og:description" />
</head><body><script>
{"playable_duration_in_ms":125000,
 "playable_url":"https:\/\/video.xx.fbcdn.net\/v\/sd.mp4?efg=abc%3D&oh=1",
 "playable_url_quality_hd":"https:\/\/video.xx.fbcdn.net\/v\/hd.mp4?oh=2"}
</script></body></html>"#;

    #[test]
    fn test_extract_prefers_hd_first() {
        let result = extract(PAGE).expect("video found");
        assert_eq!(result.qualities.len(), 2);
        assert_eq!(result.qualities[0].label, "HD");
        assert_eq!(
            result.qualities[0].url,
            "https://video.xx.fbcdn.net/v/hd.mp4?oh=2"
        );
        assert_eq!(result.qualities[1].label, "SD");
        assert_eq!(
            result.qualities[1].url,
            "https://video.xx.fbcdn.net/v/sd.mp4?efg=abc=&oh=1"
        );
        assert_eq!(result.qualities[0].mime_type, "video/mp4");
        assert_eq!(result.source, Provenance::Scraped);
    }

    #[test]
    fn test_extract_metadata() {
        let result = extract(PAGE).unwrap();
        assert_eq!(result.title, "Cat & Dog");
        assert_eq!(
            result.thumbnail_url,
            "https://scontent.xx.fbcdn.net/thumb.jpg?a=1&b=2"
        );
        assert_eq!(
            result.metadata.description.as_deref(),
            Some("A very long description")
        );
        assert_eq!(result.duration_description, "2:05");
        assert_eq!(result.qualities[0].suggested_filename, "cat___dog___hd.mp4");
    }

    #[test]
    fn test_no_video_is_none() {
        let html = r#"<html><head><meta property="og:title" content="Login"></head></html>"#;
        assert!(extract(html).is_none());
    }

    #[test]
    fn test_title_fallbacks() {
        assert_eq!(
            extract_title("<title>My clip - Facebook</title>"),
            "My clip"
        );
        assert_eq!(extract_title("<title>Facebook</title>"), DEFAULT_TITLE);
        assert_eq!(extract_title("<p>nothing</p>"), DEFAULT_TITLE);

        let long = format!(r#"<meta property="og:title" content="{}">"#, "t".repeat(250));
        assert_eq!(extract_title(&long).chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn test_placeholder_thumbnail_when_missing() {
        let html = r#"{"hd_src":"https:\/\/video.fbcdn.net\/a.mp4"}"#;
        let result = extract(html).unwrap();
        assert_eq!(result.thumbnail_url, PLACEHOLDER_THUMBNAIL);
        assert_eq!(result.title, DEFAULT_TITLE);
        assert_eq!(result.duration_description, "--:--");
        assert!(result.metadata.description.is_none());
    }

    #[test]
    fn test_rejects_non_video_and_placeholder_candidates() {
        let html = r#"{"hd_src":"https:\/\/video.fbcdn.net\/a.jpg",
                      "sd_src":"https:\/\/example.com\/placeholder.mp4"}"#;
        assert!(extract(html).is_none());
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"{"hd_src":"https:\/\/v.fbcdn.net\/a.mp4","playable_url_quality_hd":"https:\/\/v.fbcdn.net\/a.mp4"}"#;
        assert_eq!(extract(html).unwrap().qualities.len(), 1);
    }

    #[test]
    fn test_caps_at_three() {
        let html = (0..6)
            .map(|i| format!(r#""sd_src":"https:\/\/v.fbcdn.net\/{}.mp4""#, i))
            .collect::<Vec<_>>()
            .join(",");
        let result = extract(&html).unwrap();
        assert_eq!(result.qualities.len(), MAX_QUALITIES);
        assert_eq!(result.qualities[0].url, "https://v.fbcdn.net/0.mp4");
        assert!(result.qualities[1..].iter().all(|q| q.label == "SD"));
    }

    #[test]
    fn test_og_video_meta() {
        let html = r#"<meta property="og:video" content="https://video.fbcdn.net/og.mp4?x=1&amp;y=2">"#;
        let urls = find_video_urls(html);
        assert_eq!(urls, vec![("https://video.fbcdn.net/og.mp4?x=1&y=2".to_string(), "video/mp4")]);
    }

    #[test]
    fn test_raw_scan_fallback() {
        let html = r#"<script>var cfg = {src: "https:\/\/cdn.fbcdn.net\/clip.webm?t=1"};</script>"#;
        let urls = find_video_urls(html);
        assert_eq!(urls, vec![("https://cdn.fbcdn.net/clip.webm?t=1".to_string(), "video/webm")]);
    }

    #[test]
    fn test_meta_entities_and_single_quotes() {
        let html = r#"<meta property="og:title" content="Don&#x2019;t stop &#064;home">"#;
        assert_eq!(extract_title(html), "Don\u{2019}t stop @home");

        let html = "<meta property='og:title' content='Single quoted'>\
                    <meta content='https://v.fbcdn.net/og.webm' property='og:video:url'>";
        assert_eq!(extract_title(html), "Single quoted");
        assert_eq!(
            find_video_urls(html),
            vec![("https://v.fbcdn.net/og.webm".to_string(), "video/webm")]
        );
    }

    #[test]
    fn test_raw_scan_double_escaped_json() {
        let html = r#"<script>"{\"src\":\"https:\/\/cdn.fbcdn.net\/clip.mp4?a=1\u0026b=2\"}"</script>"#;
        let urls = find_video_urls(html);
        assert_eq!(
            urls,
            vec![("https://cdn.fbcdn.net/clip.mp4?a=1&b=2".to_string(), "video/mp4")]
        );
    }

    #[test]
    fn test_quicktime_gets_mov_filename() {
        let result = extract(r#"{"hd_src":"https:\/\/v.fbcdn.net\/clip.mov"}"#).unwrap();
        assert_eq!(result.qualities[0].mime_type, "video/quicktime");
        assert_eq!(result.qualities[0].suggested_filename, "facebook_video___hd.mov");
    }

    #[test]
    fn test_decode_video_url() {
        assert_eq!(
            decode_video_url(r"https:\/\/a.b\/c.mp4?x=1&y=%20z"),
            "https://a.b/c.mp4?x=1&y= z"
        );
        // Malformed percent sequences are left alone
        assert_eq!(decode_video_url("https://a.b/%ZZ.mp4"), "https://a.b/%ZZ.mp4");
    }

    proptest! {
        #[test]
        fn prop_qualities_bounded_and_marked(
            names in proptest::collection::vec("[a-z0-9]{1,10}", 0..8),
            exts in proptest::collection::vec(prop_oneof!["mp4", "jpg", "webm", "txt"], 8),
            keys in proptest::collection::vec(prop_oneof!["hd_src", "sd_src", "playable_url", "other"], 8),
        ) {
            let html = names
                .iter()
                .enumerate()
                .map(|(i, n)| format!(r#""{}":"https:\/\/v.fbcdn.net\/{}.{}""#, keys[i], n, exts[i]))
                .collect::<Vec<_>>()
                .join(",");
            if let Some(result) = extract(&html) {
                prop_assert!(!result.qualities.is_empty());
                prop_assert!(result.qualities.len() <= MAX_QUALITIES);
                for q in &result.qualities {
                    prop_assert!(VIDEO_MARKERS.iter().any(|(m, _)| q.url.contains(m)));
                }
            }
        }
    }
}
