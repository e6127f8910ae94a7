//! Video metadata for structured data and the video sitemap.
//!
//! Videos reach the site two ways:
//!
//! - **YouTube** videos embedded in posts, either with a `{{youtube:<id>}}`
//!   line (which the block scanner turns into an `Embed` block) or by linking
//!   a YouTube URL. [`extract_youtube_videos`] finds both directly in the raw
//!   document, so feeds never have to scan blocks.
//! - **Hosted files** (`.mp4`, `.webm`, `.ogg`, `.mov`) used as a project's
//!   cover or in its gallery, typically served from Cloudinary.

use crate::config::SiteConfig;
use crate::date::Date;
use crate::markup;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)([^&\s?#/)\]]+)",
    )
    .expect("valid youtube pattern")
});

static EMBED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{youtube:\s*([^}\s]+)\s*\}\}").expect("valid embed pattern"));

static CLOUDINARY_VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/v\d+/(.+)\.(?:mp4|webm|mov|avi)$").expect("valid cloudinary pattern")
});

static VIDEO_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(?:mp4|webm|ogg|mov)$").expect("valid extension pattern"));

/// Everything needed to describe one video to search engines.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub upload_date: Date,
    /// ISO 8601 duration, e.g. `PT1M30S`.
    pub duration: Option<String>,
    pub embed_url: Option<String>,
    pub content_url: Option<String>,
    pub video_id: Option<String>,
}

/// Video ID from a YouTube watch, short, embed or `/v/` URL.
pub fn extract_youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|id| markup::is_video_id(id))
}

/// All YouTube video IDs referenced by a document, in order of first
/// appearance, without duplicates.
///
/// Works on the raw text, independently of block scanning: embed tokens and
/// YouTube URLs anywhere in the document count.
pub fn extract_youtube_videos(document: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = EMBED_TOKEN
        .captures_iter(document)
        .chain(YOUTUBE_URL.captures_iter(document))
        .filter_map(|c| c.get(1))
        .filter(|m| markup::is_video_id(m.as_str()))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    found.sort_by_key(|&(pos, _)| pos);

    let mut ids: Vec<String> = Vec::new();
    for (_, id) in found {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

pub fn youtube_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
}

pub fn youtube_embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

/// Metadata for a YouTube video embedded in a post.
///
/// The video inherits the post's title, excerpt and date.
pub fn blog_video_metadata(
    video_id: &str,
    post_title: &str,
    post_excerpt: &str,
    post_date: Date,
) -> VideoMetadata {
    VideoMetadata {
        title: post_title.to_string(),
        description: post_excerpt.to_string(),
        thumbnail_url: youtube_thumbnail(video_id),
        upload_date: post_date,
        duration: None,
        embed_url: Some(youtube_embed_url(video_id)),
        content_url: None,
        video_id: Some(video_id.to_string()),
    }
}

/// Public ID and a readable title from a Cloudinary video URL.
///
/// `…/upload/v123/demo-reel_final.mp4` → (`"demo-reel_final"`, `"Demo Reel Final"`).
pub fn parse_cloudinary_video_url(url: &str) -> Option<(String, String)> {
    let public_id = CLOUDINARY_VIDEO.captures(url)?.get(1)?.as_str();
    let title = public_id
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    Some((public_id.to_string(), title))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether a media URL points at a video file.
pub fn is_video_url(url: &str) -> bool {
    VIDEO_EXTENSION.is_match(url)
}

/// Poster image for a hosted video: the same URL with a `.jpg` extension.
pub fn video_thumbnail_url(url: &str) -> String {
    VIDEO_EXTENSION.replace(url, ".jpg").into_owned()
}

/// `PT1M30S` style duration.
pub fn seconds_to_iso8601_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    if minutes > 0 {
        format!("PT{minutes}M{rest}S")
    } else {
        format!("PT{seconds}S")
    }
}

/// `VideoObject` schema for a video shown on `page_url`.
pub fn video_object_schema(config: &SiteConfig, video: &VideoMetadata, page_url: &str) -> Value {
    let person = json!({
        "@type": "Person",
        "name": config.author.name,
        "url": config.site.url,
    });
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "VideoObject",
        "name": video.title,
        "description": video.description,
        "thumbnailUrl": video.thumbnail_url,
        "uploadDate": video.upload_date.to_string(),
        "author": person,
        "publisher": person,
        "mainEntityOfPage": { "@type": "WebPage", "@id": page_url },
    });
    if let Some(duration) = &video.duration {
        schema["duration"] = json!(duration);
    }
    if let Some(content_url) = &video.content_url {
        schema["contentUrl"] = json!(content_url);
    }
    if let Some(embed_url) = &video.embed_url {
        schema["embedUrl"] = json!(embed_url);
    }
    if let Some(target) = video.embed_url.as_ref().or(video.content_url.as_ref()) {
        schema["potentialAction"] = json!({ "@type": "WatchAction", "target": target });
    }
    schema
}
