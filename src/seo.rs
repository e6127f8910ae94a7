//! Search-engine metadata.
//!
//! JSON-LD structured data (schema.org) for the pages of the site, plus the
//! small string helpers that keep URLs and meta descriptions consistent.
//! Schemas are plain [`serde_json::Value`]s; [`json_ld`] serializes one for
//! embedding in a `<script type="application/ld+json">` tag.

use crate::config::SiteConfig;
use crate::types::Post;
use serde_json::{Value, json};

/// Default meta description length, in characters.
pub const META_DESCRIPTION_LEN: usize = 160;

/// A page in a breadcrumb trail.
#[derive(Debug, Clone)]
pub struct Crumb {
    pub name: String,
    pub url: String,
}

impl Crumb {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

fn author_ref(config: &SiteConfig) -> Value {
    json!({
        "@type": "Person",
        "name": config.author.name,
        "url": config.site.url,
    })
}

/// `Person` schema for the site owner.
pub fn person_schema(config: &SiteConfig) -> Value {
    let author = &config.author;
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": author.name,
        "url": config.site.url,
        "jobTitle": author.job_title,
        "sameAs": config.social_profiles(),
    });
    if !author.email.is_empty() {
        schema["email"] = json!(author.email);
    }
    if !author.image.is_empty() {
        schema["image"] = json!(author.image);
    }
    if !author.works_for.is_empty() {
        schema["worksFor"] = json!({ "@type": "Organization", "name": author.works_for });
    }
    if !author.alumni_of.is_empty() {
        schema["alumniOf"] =
            json!({ "@type": "EducationalOrganization", "name": author.alumni_of });
    }
    if !author.knows_about.is_empty() {
        schema["knowsAbout"] = json!(author.knows_about);
    }
    schema
}

/// `WebSite` schema with a blog search action.
pub fn website_schema(config: &SiteConfig) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": config.site.name,
        "url": config.site.url,
        "description": config.site.description,
        "author": { "@type": "Person", "name": config.author.name },
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{}/blog?q={{search_term_string}}", config.site.url),
            },
            "query-input": "required name=search_term_string",
        },
    })
}

/// `Article` schema for a blog post.
pub fn article_schema(config: &SiteConfig, post: &Post) -> Value {
    let url = canonical_url(config, &format!("/blog/{}", post.slug));
    let mut author = author_ref(config);
    if !config.author.image.is_empty() {
        author["image"] = json!(config.author.image);
    }
    let mut publisher = author_ref(config);
    if !config.site.og_image.is_empty() {
        publisher["logo"] = json!({ "@type": "ImageObject", "url": config.site.og_image });
    }
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "description": post.excerpt,
        "url": url,
        "datePublished": post.date.to_string(),
        "dateModified": post.date.to_string(),
        "author": author,
        "publisher": publisher,
        "mainEntityOfPage": { "@type": "WebPage", "@id": url },
        "keywords": post.tags,
        "timeRequired": post.read_time,
        "inLanguage": config.site.language,
    });
    if let Some(image) = &post.image {
        schema["image"] = json!(image);
    }
    schema
}

/// `BreadcrumbList` schema; positions start at 1.
pub fn breadcrumb_schema(crumbs: &[Crumb]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.name,
                "item": crumb.url,
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// `Organization` schema for the personal brand.
pub fn organization_schema(config: &SiteConfig) -> Value {
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": config.site.name,
        "url": config.site.url,
        "founder": { "@type": "Person", "name": config.author.name },
        "sameAs": config.social_profiles(),
    });
    if !config.site.og_image.is_empty() {
        schema["logo"] = json!(config.site.og_image);
    }
    schema
}

/// Serialize a schema for an inline `<script>` element.
///
/// `</` is escaped so the payload can never close the script tag early.
pub fn json_ld(schema: &Value) -> String {
    schema.to_string().replace("</", "<\\/")
}

/// Absolute URL for a site path (`"/blog"` → `"https://example.com/blog"`).
pub fn canonical_url(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.site.url, path)
}

/// URL-safe slug: lowercase ASCII alphanumerics separated by single dashes.
pub fn create_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Shorten text to at most `max_len` characters plus `...`.
///
/// Prefers cutting at the last space, as long as that keeps more than 100
/// characters; otherwise cuts mid-word.
pub fn meta_description(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(max_len)
        .map_or(text.len(), |(i, _)| i);
    let truncated = &text[..cut];
    match truncated.rfind(' ') {
        Some(space) if truncated[..space].chars().count() > 100 => {
            format!("{}...", &truncated[..space])
        }
        _ => format!("{truncated}..."),
    }
}
