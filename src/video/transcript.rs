//! Caption-track discovery and timed-text parsing.
//!
//! The watch page embeds a player response whose `captionTracks` array
//! lists one timed-text URL per language. The timed-text document is a flat
//! `<transcript><text start=".." dur="..">…</text>…</transcript>` XML.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

use crate::errors::UpstreamError;

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub language_code: String,
    /// `"asr"` for auto-generated captions.
    #[serde(default)]
    pub kind: Option<String>,
}

/// Locates and decodes the caption track list embedded in a watch page.
///
/// # Errors
///
/// `NotFound` when the page has no captions, `Malformed` when the embedded
/// JSON cannot be decoded.
pub fn extract_caption_tracks(watch_html: &str) -> Result<Vec<CaptionTrack>, UpstreamError> {
    let Some(start) = watch_html.find(CAPTION_TRACKS_KEY) else {
        return Err(UpstreamError::NotFound(
            "video has no captions available".to_string(),
        ));
    };
    let rest = &watch_html[start + CAPTION_TRACKS_KEY.len()..];

    let tracks = serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
        .ok_or_else(|| UpstreamError::Malformed("empty caption track list".to_string()))?
        .map_err(|e| UpstreamError::Malformed(format!("caption track list: {e}")))?;

    if tracks.is_empty() {
        return Err(UpstreamError::NotFound(
            "video has no captions available".to_string(),
        ));
    }
    Ok(tracks)
}

/// Picks a manual track in `language`, then an auto-generated one in
/// `language`, then whatever comes first.
#[must_use]
pub fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let matches_lang = |t: &&CaptionTrack| {
        t.language_code == language
            || t.language_code
                .split('-')
                .next()
                .is_some_and(|primary| primary == language)
    };
    let is_asr = |t: &&CaptionTrack| t.kind.as_deref() == Some("asr");

    tracks
        .iter()
        .filter(matches_lang)
        .find(|t| !is_asr(t))
        .or_else(|| tracks.iter().find(matches_lang))
        .or_else(|| tracks.first())
}

/// Joins every `<text>` segment of a timed-text document with single spaces.
///
/// # Errors
///
/// `Malformed` if the XML cannot be read, `NotFound` if it holds no text.
pub fn parse_timed_text(xml: &str) -> Result<String, UpstreamError> {
    let mut reader = Reader::from_str(xml);
    let mut segments: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                in_text = true;
                current.clear();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                in_text = false;
                let segment = normalize_segment(&current);
                if !segment.is_empty() {
                    segments.push(segment);
                }
            }
            Ok(Event::Text(t)) if in_text => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| UpstreamError::Malformed(format!("timed text: {e}")))?;
                current.push_str(&unescaped);
            }
            Ok(Event::CData(t)) if in_text => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(UpstreamError::Malformed(format!(
                    "timed text at position {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }

    if segments.is_empty() {
        return Err(UpstreamError::NotFound("transcript is empty".to_string()));
    }
    Ok(segments.join(" "))
}

/// Timed text is frequently double-escaped (`&amp;#39;`), so a second pass
/// resolves the common entities left after XML unescaping. Line breaks inside
/// a segment collapse to spaces.
fn normalize_segment(raw: &str) -> String {
    let decoded = raw
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
