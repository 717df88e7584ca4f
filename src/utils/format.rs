//! Small text formatting helpers shared by the extractors and the client payload

/// Maximum length of a suggested download filename (without extension)
pub const MAX_FILENAME_LEN: usize = 100;

/// Truncate to at most `max` characters, respecting char boundaries
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Format an integer with `,` thousands separators (e.g. 12,345)
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render a duration as `m:ss`, or `h:mm:ss` past one hour
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// File extension for a quality's MIME type, `mp4` when unknown
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "audio/mp3" | "audio/mpeg" => "mp3",
        _ => "mp4",
    }
}

/// Sanitize a free-text name into a download filename stem.
///
/// Characters other than ASCII alphanumerics and whitespace become `_`,
/// whitespace runs collapse to a single `_`, the result is lowercased and
/// capped at [`MAX_FILENAME_LEN`].
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push('_');
        }
    }
    truncate_chars(&out, MAX_FILENAME_LEN)
}

/// Full suggested filename for one rendition: `<title>_-_<label>.<ext>`
pub fn suggested_filename(title: &str, label: &str, mime_type: &str) -> String {
    format!(
        "{}.{}",
        sanitize_filename(&format!("{} - {}", title, label)),
        extension_for_mime(mime_type)
    )
}
