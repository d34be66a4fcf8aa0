use regex::Regex;
use url::Url;

static VIDEO_ID_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,64}$")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

/// Accepts a bare video id or a YouTube URL and returns the bare id.
///
/// Recognized URL shapes:
/// - `https://www.youtube.com/watch?v=<id>` (also `m.` and `music.` hosts)
/// - `https://youtu.be/<id>`
/// - `https://www.youtube.com/{shorts,embed,live}/<id>`
#[must_use]
pub fn parse_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if is_valid_video_id(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.trim_start_matches("www.");

    let candidate = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("shorts" | "embed" | "live") => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    }?;

    is_valid_video_id(&candidate).then_some(candidate)
}

#[must_use]
pub fn is_valid_video_id(id: &str) -> bool {
    VIDEO_ID_RE.is_match(id)
}
