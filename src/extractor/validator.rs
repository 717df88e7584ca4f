//! Facebook URL validation and canonicalization
//!
//! Accepts anything that looks like a video-bearing Facebook page. The path
//! list is permissive: passing validation says nothing about
//! whether the page actually contains a video.

use crate::utils::error::FbloaderError;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Query parameters that identify content and survive canonicalization
pub(crate) const KEPT_QUERY_PARAMS: &[&str] = &["v", "id", "story_fbid"];

/// Hosts (substring match) considered Facebook
pub(crate) const FACEBOOK_HOSTS: &[&str] = &["facebook.com", "fb.watch"];

/// Human-readable list of accepted URL shapes, used in error messages
pub const SUPPORTED_FORMATS: &[&str] = &[
    "https://www.facebook.com/watch/?v=...",
    "https://www.facebook.com/<page>/videos/...",
    "https://www.facebook.com/video.php?v=...",
    "https://www.facebook.com/reel/...",
    "https://www.facebook.com/share/v/...",
    "https://www.facebook.com/story.php?story_fbid=...",
    "https://www.facebook.com/<page>/posts/...",
    "https://m.facebook.com/... (mobile links)",
    "https://fb.watch/...",
];

/// Path (plus kept query) shapes of video-bearing pages
pub(crate) const VIDEO_PATHS: &[&str] = &[
    r"/videos?/",
    r"/video\.php",
    r"/watch/?",
    r"/share/v/",
    r"/reel/",
    r"/story\.php",
    r"/posts/",
    r"/photo\.php",
];

static VIDEO_PATH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    VIDEO_PATHS
        .iter()
        .map(|p| Regex::new(p).expect("valid video path pattern"))
        .collect()
});

/// A validated, canonical Facebook URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate and canonicalize user input.
///
/// Never panics; anything unparsable or off-site is `InvalidUrl`.
pub fn validate(input: &str) -> Result<CanonicalUrl, FbloaderError> {
    let invalid = || FbloaderError::InvalidUrl(input.to_string());

    let lowered = input.to_ascii_lowercase();
    if !FACEBOOK_HOSTS.iter().any(|h| lowered.contains(h)) {
        return Err(invalid());
    }

    let url = parse_lenient(input.trim()).ok_or_else(invalid)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
    if !FACEBOOK_HOSTS.iter().any(|h| host.contains(h)) {
        return Err(invalid());
    }

    let canonical = strip_query(url);
    if !is_video_path(&host, &canonical) {
        return Err(invalid());
    }

    Ok(CanonicalUrl(canonical.to_string()))
}

/// Canonicalize without checking the path shape.
///
/// Returns `None` when the input does not parse as an absolute URL.
pub fn canonicalize(input: &str) -> Option<String> {
    parse_lenient(input.trim()).map(|url| strip_query(url).to_string())
}

fn parse_lenient(input: &str) -> Option<Url> {
    if input.is_empty() {
        return None;
    }
    match Url::parse(input) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) if !input.contains("://") => {
            Url::parse(&format!("https://{}", input)).ok()
        }
        Err(_) => None,
    }
}

fn strip_query(mut url: Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| KEPT_QUERY_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_fragment(None);
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url
}

fn is_video_path(host: &str, url: &Url) -> bool {
    if host.contains("fb.watch") {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .is_some_and(|first| !first.is_empty());
    }

    let path = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    VIDEO_PATH_PATTERNS.iter().any(|re| re.is_match(&path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_known_shapes() {
        let urls = [
            "https://www.facebook.com/watch/?v=123456789",
            "https://facebook.com/watch?v=123",
            "https://www.facebook.com/SomePage/videos/987654321/",
            "https://www.facebook.com/video.php?v=42",
            "https://www.facebook.com/reel/1187641342944587",
            "https://www.facebook.com/share/v/1AbCdEf/",
            "https://www.facebook.com/story.php?story_fbid=1&id=2",
            "https://www.facebook.com/page/posts/pfbid0abc",
            "https://www.facebook.com/photo.php?fbid=9",
            "https://m.facebook.com/watch/?v=1",
            "https://fb.watch/aBcD12/",
            "facebook.com/watch?v=123",
            "fb.watch/xyz",
        ];
        for url in urls {
            assert!(validate(url).is_ok(), "expected valid: {}", url);
        }
    }

    #[test]
    fn test_rejects_invalid() {
        let urls = [
            "",
            "not a url",
            "https://youtube.com/watch?v=abc",
            "https://www.facebook.com/",
            "https://www.facebook.com/SomePage",
            "https://fb.watch/",
            "ftp://facebook.com/watch?v=1",
            "https://example.com/facebook.com/watch",
        ];
        for url in urls {
            assert!(validate(url).is_err(), "expected invalid: {}", url);
        }
    }

    #[test]
    fn test_strips_tracking_params() {
        let canonical =
            validate("https://www.facebook.com/watch/?v=123&mibextid=abc&ref=share#frag").unwrap();
        assert_eq!(canonical.as_str(), "https://www.facebook.com/watch/?v=123");

        let canonical =
            validate("https://www.facebook.com/story.php?story_fbid=5&id=6&__tn__=x").unwrap();
        assert_eq!(
            canonical.as_str(),
            "https://www.facebook.com/story.php?story_fbid=5&id=6"
        );

        let canonical = validate("https://www.facebook.com/reel/77?s=yWAINhsB").unwrap();
        assert_eq!(canonical.as_str(), "https://www.facebook.com/reel/77");
    }

    #[test]
    fn test_watch_without_video_param_still_matches() {
        // /watch/ alone is a video-bearing page type
        assert!(validate("https://www.facebook.com/watch/").is_ok());
    }

    proptest! {
        #[test]
        fn prop_non_facebook_is_invalid(s in "\\PC*") {
            let lowered = s.to_ascii_lowercase();
            prop_assume!(!lowered.contains("facebook.com") && !lowered.contains("fb.watch"));
            prop_assert!(validate(&s).is_err());
        }

        #[test]
        fn prop_canonicalize_idempotent(
            path in "(watch/|reel/[0-9]{1,12}|[a-z]{1,8}/videos/[0-9]{1,12}|video\\.php)",
            v in "[0-9]{1,12}",
            junk in "[a-z_]{1,8}",
            junk_val in "[A-Za-z0-9]{0,8}",
        ) {
            let input = format!("https://www.facebook.com/{}?{}={}&v={}", path, junk, junk_val, v);
            let once = canonicalize(&input).unwrap();
            let twice = canonicalize(&once).unwrap();
            prop_assert_eq!(&once, &twice);

            if let Ok(valid) = validate(&input) {
                prop_assert_eq!(validate(valid.as_str()).unwrap(), valid);
            }
        }
    }
}
