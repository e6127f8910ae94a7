//! Shared content records.
//!
//! These are produced by [`content::load`](crate::content::load) and consumed
//! by page generation and the feed serializers. The `content`/`description`
//! strings are raw markdown-lite documents; they are scanned into blocks at
//! render time, never stored pre-parsed.

use crate::date::Date;
use serde::{Deserialize, Serialize};

/// A blog post from `content/blog/<slug>.md`.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// URL slug (file stem).
    pub slug: String,
    pub title: String,
    /// Markdown-lite body, everything after the front matter.
    pub content: String,
    /// From front matter, or derived from the body's first 160 characters.
    pub excerpt: String,
    pub date: Date,
    /// e.g. `"8 min read"`; derived from the word count when not given.
    pub read_time: String,
    pub tags: Vec<String>,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Path of the source file relative to the content root.
    pub source_path: String,
}

/// A portfolio project from `content/projects/<slug>.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// URL slug (file stem). Not read from the file.
    #[serde(skip_deserializing)]
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Markdown-lite document.
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Live site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    pub date: Date,
    /// Cover image or demo video URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Length of the cover video in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<u64>,
    #[serde(default)]
    pub gallery: Vec<GalleryItem>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub impact: String,
}

/// An image or video shown on a project page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryItem {
    pub url: String,
    #[serde(default)]
    pub caption: String,
    /// Video length in seconds; ignored for images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// Resume data for the home page, from `content/resume.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Resume {
    /// One-line summary under the name.
    pub headline: Option<String>,
    pub location: Option<String>,
    /// Markdown-lite "about" section.
    pub about: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
}

/// One position in the work history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub company: String,
    pub role: String,
    /// Free-form, e.g. `"2023 – Present"`.
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: String,
}
