//! Machine-readable site files.
//!
//! | File | Function |
//! |------|----------|
//! | `rss.xml` | [`rss`] |
//! | `sitemap.xml` | [`sitemap`] |
//! | `video-sitemap.xml` | [`video_sitemap`] |
//! | `robots.txt` | [`robots_txt`] |
//! | `manifest.webmanifest` | [`web_manifest`] |
//!
//! Every serializer is a pure function of the loaded content. Timestamps come
//! from [`build_date`] (the newest content date) rather than the clock, so
//! rebuilding unchanged content produces byte-identical files and the write
//! cache can skip them.

use crate::config::SiteConfig;
use crate::date::Date;
use crate::types::{Post, Project};
use crate::video;
use serde_json::json;
use std::fmt::Write as _;

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap text in a CDATA section; a literal `]]>` is split across two sections.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// Newest post or project date.
pub fn build_date(posts: &[Post], projects: &[Project]) -> Option<Date> {
    posts
        .iter()
        .map(|p| p.date)
        .chain(projects.iter().map(|p| p.date))
        .max()
}

/// RSS 2.0 feed of the newest `feeds.rss_items` posts.
///
/// `posts` must already be sorted newest first.
pub fn rss(config: &SiteConfig, posts: &[Post], build_date: Option<Date>) -> String {
    let site = &config.site;
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n  <channel>\n");
    let _ = writeln!(xml, "    <title>{} - Blog</title>", escape_xml(&site.name));
    let _ = writeln!(xml, "    <link>{}/blog</link>", site.url);
    let _ = writeln!(
        xml,
        "    <description>{}</description>",
        escape_xml(&site.description)
    );
    let _ = writeln!(
        xml,
        "    <language>{}</language>",
        escape_xml(&site.language.to_lowercase())
    );
    if let Some(date) = build_date {
        let _ = writeln!(xml, "    <lastBuildDate>{}</lastBuildDate>", date.to_rfc2822());
    }
    for post in posts.iter().take(config.feeds.rss_items) {
        let url = format!("{}/blog/{}", site.url, post.slug);
        xml.push_str("    <item>\n");
        let _ = writeln!(xml, "      <title>{}</title>", escape_xml(&post.title));
        let _ = writeln!(xml, "      <link>{url}</link>");
        let _ = writeln!(xml, "      <guid>{url}</guid>");
        let _ = writeln!(xml, "      <pubDate>{}</pubDate>", post.date.to_rfc2822());
        let _ = writeln!(
            xml,
            "      <description>{}</description>",
            escape_xml(&post.excerpt)
        );
        for tag in &post.tags {
            let _ = writeln!(xml, "      <category>{}</category>", escape_xml(tag));
        }
        xml.push_str("    </item>\n");
    }
    xml.push_str("  </channel>\n</rss>\n");
    xml
}

struct SitemapUrl {
    loc: String,
    lastmod: Option<Date>,
    changefreq: &'static str,
    priority: &'static str,
}

/// XML sitemap: the three index pages, then every post and project.
pub fn sitemap(
    config: &SiteConfig,
    posts: &[Post],
    projects: &[Project],
    build_date: Option<Date>,
) -> String {
    let url = &config.site.url;
    let mut entries = vec![
        SitemapUrl {
            loc: url.clone(),
            lastmod: build_date,
            changefreq: "monthly",
            priority: "1.0",
        },
        SitemapUrl {
            loc: format!("{url}/blog"),
            lastmod: build_date,
            changefreq: "weekly",
            priority: "0.8",
        },
        SitemapUrl {
            loc: format!("{url}/projects"),
            lastmod: build_date,
            changefreq: "monthly",
            priority: "0.7",
        },
    ];
    entries.extend(posts.iter().map(|post| SitemapUrl {
        loc: format!("{url}/blog/{}", post.slug),
        lastmod: Some(post.date),
        changefreq: "monthly",
        priority: "0.6",
    }));
    entries.extend(projects.iter().map(|project| SitemapUrl {
        loc: format!("{url}/projects/{}", project.slug),
        lastmod: Some(project.date),
        changefreq: "monthly",
        priority: "0.55",
    }));

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for entry in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&entry.loc));
        if let Some(date) = entry.lastmod {
            let _ = writeln!(xml, "    <lastmod>{date}</lastmod>");
        }
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", entry.changefreq);
        let _ = writeln!(xml, "    <priority>{}</priority>", entry.priority);
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// One `<video:video>` element of the video sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEntry {
    /// Page the video appears on.
    pub page_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub content_url: Option<String>,
    pub player_url: Option<String>,
    pub publication_date: Date,
    /// Length in seconds, when known.
    pub duration: Option<u64>,
    pub tags: Vec<String>,
}

impl VideoEntry {
    /// The same video as `VideoObject` input for the page's JSON-LD.
    pub fn metadata(&self) -> video::VideoMetadata {
        video::VideoMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            upload_date: self.publication_date,
            duration: self.duration.map(video::seconds_to_iso8601_duration),
            embed_url: self.player_url.clone(),
            content_url: self.content_url.clone(),
            video_id: self
                .player_url
                .as_deref()
                .and_then(video::extract_youtube_video_id)
                .map(str::to_string),
        }
    }
}

/// Every video on the site: YouTube embeds in posts, then hosted project
/// videos (cover first, then gallery order).
pub fn video_entries(config: &SiteConfig, posts: &[Post], projects: &[Project]) -> Vec<VideoEntry> {
    let url = &config.site.url;
    let mut entries = Vec::new();

    for post in posts {
        for id in video::extract_youtube_videos(&post.content) {
            let meta = video::blog_video_metadata(&id, &post.title, &post.excerpt, post.date);
            entries.push(VideoEntry {
                page_url: format!("{url}/blog/{}", post.slug),
                thumbnail_url: meta.thumbnail_url,
                title: meta.title,
                description: meta.description,
                content_url: None,
                player_url: meta.embed_url,
                publication_date: meta.upload_date,
                duration: None,
                tags: post.tags.clone(),
            });
        }
    }

    for project in projects {
        let page_url = format!("{url}/projects/{}", project.slug);
        let hosted = |media_url: &str,
                      duration: Option<u64>,
                      fallback_title: String,
                      description: String| {
            let title = video::parse_cloudinary_video_url(media_url)
                .map(|(_, title)| title)
                .unwrap_or(fallback_title);
            VideoEntry {
                page_url: page_url.clone(),
                thumbnail_url: video::video_thumbnail_url(media_url),
                title,
                description,
                content_url: Some(media_url.to_string()),
                player_url: None,
                publication_date: project.date,
                duration,
                tags: project.technologies.clone(),
            }
        };

        if let Some(image) = project.image.as_deref().filter(|u| video::is_video_url(u)) {
            entries.push(hosted(
                image,
                project.video_duration,
                format!("{} - Demo Video", project.title),
                format!(
                    "Demo video showcasing {}: {}",
                    project.title, project.excerpt
                ),
            ));
        }
        for (index, item) in project.gallery.iter().enumerate() {
            if !video::is_video_url(&item.url) {
                continue;
            }
            let description = if item.caption.is_empty() {
                format!("Gallery video for {}", project.title)
            } else {
                item.caption.clone()
            };
            entries.push(hosted(
                &item.url,
                item.duration,
                format!("{} - Gallery Video {}", project.title, index + 1),
                description,
            ));
        }
    }
    entries
}

/// Google video sitemap for all embedded and hosted videos.
pub fn video_sitemap(config: &SiteConfig, posts: &[Post], projects: &[Project]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(
        "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"\n        \
         xmlns:video=\"http://www.google.com/schemas/sitemap-video/1.1\">\n",
    );
    for entry in video_entries(config, posts, projects) {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&entry.page_url));
        xml.push_str("    <video:video>\n");
        let _ = writeln!(
            xml,
            "      <video:thumbnail_loc>{}</video:thumbnail_loc>",
            escape_xml(&entry.thumbnail_url)
        );
        let _ = writeln!(xml, "      <video:title>{}</video:title>", cdata(&entry.title));
        let _ = writeln!(
            xml,
            "      <video:description>{}</video:description>",
            cdata(&entry.description)
        );
        if let Some(content) = &entry.content_url {
            let _ = writeln!(
                xml,
                "      <video:content_loc>{}</video:content_loc>",
                escape_xml(content)
            );
        }
        if let Some(player) = &entry.player_url {
            let _ = writeln!(
                xml,
                "      <video:player_loc>{}</video:player_loc>",
                escape_xml(player)
            );
        }
        let _ = writeln!(
            xml,
            "      <video:publication_date>{}</video:publication_date>",
            entry.publication_date
        );
        if let Some(seconds) = entry.duration {
            let _ = writeln!(xml, "      <video:duration>{seconds}</video:duration>");
        }
        xml.push_str("      <video:family_friendly>yes</video:family_friendly>\n");
        for tag in &entry.tags {
            let _ = writeln!(xml, "      <video:tag>{}</video:tag>", escape_xml(tag));
        }
        xml.push_str("    </video:video>\n  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

const DISALLOWED: [&str; 5] = ["/api/", "/_next/", "/private/", "/*.json$", "/*?ref=*"];

/// `robots.txt` allowing everything except the usual private paths.
pub fn robots_txt(config: &SiteConfig) -> String {
    let url = &config.site.url;
    let mut out = String::new();
    for agent in ["*", "Googlebot"] {
        let _ = writeln!(out, "User-Agent: {agent}");
        out.push_str("Allow: /\n");
        for path in DISALLOWED {
            let _ = writeln!(out, "Disallow: {path}");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "Host: {url}");
    let _ = writeln!(out, "Sitemap: {url}/sitemap.xml");
    let _ = writeln!(out, "Sitemap: {url}/video-sitemap.xml");
    out
}

/// Web app manifest (JSON).
pub fn web_manifest(config: &SiteConfig) -> String {
    let site = &config.site;
    let lang = site
        .language
        .split('-')
        .next()
        .unwrap_or(&site.language)
        .to_string();
    let manifest = json!({
        "name": site.title,
        "short_name": site.name,
        "description": site.description,
        "start_url": "/",
        "display": "standalone",
        "background_color": config.colors.light.background,
        "theme_color": config.colors.light.text,
        "icons": [
            { "src": "/favicon.ico", "sizes": "any", "type": "image/x-icon" },
            { "src": "/favicon.svg", "sizes": "any", "type": "image/svg+xml" },
            { "src": "/apple-touch-icon.png", "sizes": "180x180", "type": "image/png" },
            { "src": "/icon-192x192.png", "sizes": "192x192", "type": "image/png" },
            { "src": "/icon-512x512.png", "sizes": "512x512", "type": "image/png" },
        ],
        "categories": ["technology", "portfolio", "blog"],
        "lang": lang,
        "dir": "ltr",
    });
    // Serializing a `Value` cannot fail.
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}
