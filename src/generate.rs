//! HTML site generation.
//!
//! Takes the loaded [`Manifest`] and writes the final static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): resume, recent posts and projects
//! - **Blog index** (`/blog/index.html`): every post, newest first
//! - **Posts** (`/blog/{slug}/index.html`)
//! - **Projects index** (`/projects/index.html`)
//! - **Projects** (`/projects/{slug}/index.html`)
//! - **Not found** (`/404.html`)
//!
//! Every page carries a canonical link, Open Graph and Twitter card meta,
//! and JSON-LD structured data.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── blog/
//! │   ├── index.html
//! │   └── hello-world/index.html
//! ├── projects/
//! │   ├── index.html
//! │   └── contract-search/index.html
//! ├── rss.xml
//! ├── sitemap.xml
//! ├── video-sitemap.xml
//! ├── robots.txt
//! ├── manifest.webmanifest
//! ├── favicon.svg                # from content/assets/
//! └── .build-manifest.json       # write cache
//! ```
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and inlined into every
//! page, prefixed with the color variables generated from config.
//!
//! ## Parallelism
//!
//! Pages are rendered in parallel with rayon (the global pool is sized from
//! `[processing]`); writing goes through the [`SiteWriter`] sequentially.

use crate::cache::{CacheStats, SiteWriter, WriteOutcome};
use crate::config::{self, SiteConfig};
use crate::content::Manifest;
use crate::date::Date;
use crate::feeds;
use crate::render;
use crate::seo::{self, Crumb};
use crate::types::{Post, Project, Resume};
use crate::video;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Posts shown on the home page.
const RECENT_POSTS: usize = 5;

/// What kind of page a rendered file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    BlogIndex,
    Post,
    ProjectsIndex,
    Project,
    NotFound,
}

/// A page rendered in memory, not yet written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub kind: PageKind,
    pub title: String,
    /// Output path relative to the output directory.
    pub path: String,
    pub html: String,
}

/// A written file and whether the write cache skipped it.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: String,
    pub outcome: WriteOutcome,
}

/// Result of a build, for CLI output.
#[derive(Debug, Clone)]
pub struct PageReport {
    pub kind: PageKind,
    pub title: String,
    pub path: String,
    pub outcome: WriteOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages: Vec<PageReport>,
    pub feeds: Vec<FileReport>,
    pub assets: Vec<FileReport>,
    pub stats: CacheStats,
}

/// Write the whole site into `output_dir`.
///
/// `source_root` is the content directory, used to read assets.
pub fn generate(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
    use_cache: bool,
) -> Result<BuildReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let mut writer = SiteWriter::new(output_dir, use_cache);
    let mut report = BuildReport::default();

    for page in render_pages(manifest) {
        let outcome = writer.write(&page.path, page.html.as_bytes())?;
        report.pages.push(PageReport {
            kind: page.kind,
            title: page.title,
            path: page.path,
            outcome,
        });
    }

    for (path, body) in feed_files(manifest) {
        let outcome = writer.write(path, body.as_bytes())?;
        report.feeds.push(FileReport {
            path: path.to_string(),
            outcome,
        });
    }

    for asset in &manifest.assets {
        let bytes = fs::read(source_root.join(asset))?;
        let target = asset
            .strip_prefix("assets/")
            .unwrap_or(asset)
            .replace('\\', "/");
        let outcome = writer.write(&target, &bytes)?;
        report.assets.push(FileReport {
            path: target,
            outcome,
        });
    }

    report.stats = writer.finish()?;
    Ok(report)
}

/// Feed files and their contents, in output order.
pub fn feed_files(manifest: &Manifest) -> Vec<(&'static str, String)> {
    let config = &manifest.config;
    let build_date = feeds::build_date(&manifest.posts, &manifest.projects);
    vec![
        ("rss.xml", feeds::rss(config, &manifest.posts, build_date)),
        (
            "sitemap.xml",
            feeds::sitemap(config, &manifest.posts, &manifest.projects, build_date),
        ),
        (
            "video-sitemap.xml",
            feeds::video_sitemap(config, &manifest.posts, &manifest.projects),
        ),
        ("robots.txt", feeds::robots_txt(config)),
        ("manifest.webmanifest", feeds::web_manifest(config)),
    ]
}

enum PageJob<'a> {
    Home,
    BlogIndex,
    Post(&'a Post),
    ProjectsIndex,
    Project(&'a Project),
    NotFound,
}

/// Shared inputs of every page template.
struct Site<'a> {
    manifest: &'a Manifest,
    config: &'a SiteConfig,
    css: String,
    build_date: Option<Date>,
}

/// Render every page, in parallel. Output order is stable: home, blog
/// index, posts, projects index, projects, 404.
pub fn render_pages(manifest: &Manifest) -> Vec<RenderedPage> {
    let site = Site {
        manifest,
        config: &manifest.config,
        css: format!(
            "{}\n\n{}",
            config::generate_color_css(&manifest.config.colors),
            CSS_STATIC
        ),
        build_date: feeds::build_date(&manifest.posts, &manifest.projects),
    };

    let mut jobs = vec![PageJob::Home, PageJob::BlogIndex];
    jobs.extend(manifest.posts.iter().map(PageJob::Post));
    jobs.push(PageJob::ProjectsIndex);
    jobs.extend(manifest.projects.iter().map(PageJob::Project));
    jobs.push(PageJob::NotFound);

    jobs.par_iter().map(|job| site.render(job)).collect()
}

impl Site<'_> {
    fn render(&self, job: &PageJob<'_>) -> RenderedPage {
        let (kind, title, path, markup) = match job {
            PageJob::Home => (
                PageKind::Home,
                "Home".to_string(),
                "index.html".to_string(),
                render_home(self),
            ),
            PageJob::BlogIndex => (
                PageKind::BlogIndex,
                "Blog".to_string(),
                "blog/index.html".to_string(),
                render_blog_index(self),
            ),
            PageJob::Post(post) => (
                PageKind::Post,
                post.title.clone(),
                format!("blog/{}/index.html", post.slug),
                render_post(self, post),
            ),
            PageJob::ProjectsIndex => (
                PageKind::ProjectsIndex,
                "Projects".to_string(),
                "projects/index.html".to_string(),
                render_projects_index(self),
            ),
            PageJob::Project(project) => (
                PageKind::Project,
                project.title.clone(),
                format!("projects/{}/index.html", project.slug),
                render_project(self, project),
            ),
            PageJob::NotFound => (
                PageKind::NotFound,
                "Not Found".to_string(),
                "404.html".to_string(),
                render_not_found(self),
            ),
        };
        RenderedPage {
            kind,
            title,
            path,
            html: markup.into_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        seo::canonical_url(self.config, path)
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Top-level navigation sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Home,
    Blog,
    Projects,
    None,
}

/// Head metadata of one page.
struct PageMeta<'a> {
    /// Full `<title>`.
    title: String,
    description: &'a str,
    /// Site path for the canonical URL, `""` for the home page.
    path: String,
    og_type: &'static str,
    image: Option<&'a str>,
    published: Option<Date>,
    noindex: bool,
    schemas: Vec<Value>,
}

impl<'a> PageMeta<'a> {
    fn new(site: &Site<'a>, title: Option<&str>, description: &'a str, path: String) -> Self {
        let config = site.config;
        Self {
            title: match title {
                Some(t) => format!("{t} | {}", config.site.name),
                None => config.site.title.clone(),
            },
            description,
            path,
            og_type: "website",
            image: Some(config.site.og_image.as_str()).filter(|s| !s.is_empty()),
            published: None,
            noindex: false,
            schemas: Vec::new(),
        }
    }
}

/// Renders the base HTML document structure
fn base_document(site: &Site<'_>, meta: &PageMeta<'_>, current: Section, content: Markup) -> Markup {
    let config = site.config;
    let canonical = site.url(&meta.path);
    let card = if meta.image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };
    html! {
        (DOCTYPE)
        html lang=(config.site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                meta name="author" content=(config.author.name);
                @if !config.site.keywords.is_empty() {
                    meta name="keywords" content=(config.site.keywords.join(", "));
                }
                @if meta.noindex {
                    meta name="robots" content="noindex";
                }
                meta name="theme-color" content=(config.colors.light.text);
                link rel="canonical" href=(canonical);
                link rel="alternate" type="application/rss+xml"
                    title={ (config.site.name) " - Blog" } href="/rss.xml";
                link rel="manifest" href="/manifest.webmanifest";
                meta property="og:type" content=(meta.og_type);
                meta property="og:site_name" content=(config.site.name);
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                meta property="og:url" content=(canonical);
                @if let Some(image) = meta.image {
                    meta property="og:image" content=(image);
                }
                @if let Some(date) = meta.published {
                    meta property="article:published_time" content=(date.to_string());
                }
                meta name="twitter:card" content=(card);
                meta name="twitter:title" content=(meta.title);
                meta name="twitter:description" content=(meta.description);
                @if !config.site.twitter_handle.is_empty() {
                    meta name="twitter:creator" content=(config.site.twitter_handle);
                }
                @if let Some(image) = meta.image {
                    meta name="twitter:image" content=(image);
                }
                style { (PreEscaped(&site.css)) }
                @for schema in &meta.schemas {
                    script type="application/ld+json" { (PreEscaped(seo::json_ld(schema))) }
                }
            }
            body {
                (site_header(site, current))
                (content)
                (site_footer(site))
            }
        }
    }
}

/// Renders the site header with the section navigation
fn site_header(site: &Site<'_>, current: Section) -> Markup {
    let items = [
        (Section::Home, "/", "Home"),
        (Section::Blog, "/blog", "Blog"),
        (Section::Projects, "/projects", "Projects"),
    ];
    html! {
        header.site-header {
            a.site-name href="/" { (site.config.site.name) }
            nav.site-nav {
                ul {
                    @for (section, href, label) in items {
                        li class=[(section == current).then_some("current")] {
                            a href=(href) { (label) }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(site: &Site<'_>) -> Markup {
    let author = &site.config.author;
    let social = [
        ("GitHub", author.github.as_str()),
        ("LinkedIn", author.linkedin.as_str()),
        ("Twitter", author.twitter.as_str()),
    ];
    html! {
        footer.site-footer {
            p {
                "© "
                @if let Some(date) = site.build_date {
                    (date.year()) " "
                }
                (author.name)
            }
            ul.social-links {
                @for (label, url) in social.iter().filter(|(_, url)| !url.is_empty()) {
                    li { a href=(url) target="_blank" rel="noopener noreferrer" { (label) } }
                }
                li { a href="/rss.xml" { "RSS" } }
            }
        }
    }
}

fn tag_list(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li { (tag) }
                }
            }
        }
    }
}

fn post_meta_line(post: &Post) -> Markup {
    html! {
        p.post-meta {
            time datetime=(post.date.to_string()) { (post.date.long_form()) }
            " · "
            (post.read_time)
        }
    }
}

fn post_summary(post: &Post) -> Markup {
    html! {
        article.post-summary {
            h3 { a href={ "/blog/" (post.slug) } { (post.title) } }
            (post_meta_line(post))
            p.excerpt { (post.excerpt) }
            (tag_list(&post.tags))
        }
    }
}

fn project_card(project: &Project) -> Markup {
    html! {
        article.project-card {
            h3 { a href={ "/projects/" (project.slug) } { (project.title) } }
            p.excerpt { (project.excerpt) }
            (tag_list(&project.technologies))
        }
    }
}

/// Image or video, picked by file extension.
fn media(url: &str, alt: &str) -> Markup {
    html! {
        @if video::is_video_url(url) {
            video src=(url) poster=(video::video_thumbnail_url(url))
                controls muted playsinline preload="metadata" {}
        } @else {
            img src=(url) alt=(alt) loading="lazy";
        }
    }
}

fn breadcrumb(site: &Site<'_>, trail: &[(&str, &str)]) -> Value {
    let crumbs: Vec<Crumb> = std::iter::once(Crumb::new("Home", site.url("")))
        .chain(
            trail
                .iter()
                .map(|(name, path)| Crumb::new(*name, site.url(path))),
        )
        .collect();
    seo::breadcrumb_schema(&crumbs)
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(site: &Site<'_>) -> Markup {
    let config = site.config;
    let manifest = site.manifest;
    let mut meta = PageMeta::new(site, None, &config.site.description, String::new());
    meta.schemas = vec![
        seo::person_schema(config),
        seo::website_schema(config),
        seo::organization_schema(config),
    ];

    let content = html! {
        main.home-page {
            section.intro {
                h1 { (config.author.name) }
                @if let Some(resume) = &manifest.resume {
                    (render_resume(resume))
                } @else {
                    p.headline { (config.author.job_title) }
                }
            }
            @if !manifest.posts.is_empty() {
                section.recent-posts {
                    h2 { "Writing" }
                    @for post in manifest.posts.iter().take(RECENT_POSTS) {
                        (post_summary(post))
                    }
                    @if manifest.posts.len() > RECENT_POSTS {
                        p { a href="/blog" { "All posts →" } }
                    }
                }
            }
            @if !manifest.projects.is_empty() {
                section.projects {
                    h2 { "Projects" }
                    div.project-grid {
                        @for project in &manifest.projects {
                            (project_card(project))
                        }
                    }
                }
            }
        }
    };

    base_document(site, &meta, Section::Home, content)
}

fn render_resume(resume: &Resume) -> Markup {
    html! {
        @if let Some(headline) = &resume.headline {
            p.headline { (headline) }
        }
        @if let Some(location) = &resume.location {
            p.location { (location) }
        }
        @if let Some(about) = &resume.about {
            div.about { (render::document(about)) }
        }
        @if !resume.experience.is_empty() {
            section.experience {
                h2 { "Experience" }
                @for job in &resume.experience {
                    article.position {
                        h3 {
                            (job.role) " · "
                            @if let Some(url) = &job.url {
                                a href=(url) target="_blank" rel="noopener noreferrer" { (job.company) }
                            } @else {
                                (job.company)
                            }
                        }
                        p.position-meta {
                            (job.period)
                            @if let Some(location) = &job.location {
                                " · " (location)
                            }
                        }
                        @if !job.summary.is_empty() {
                            div.summary { (render::document(&job.summary)) }
                        }
                    }
                }
            }
        }
        @if !resume.skills.is_empty() {
            section.skills {
                h2 { "Skills" }
                (tag_list(&resume.skills))
            }
        }
    }
}

fn render_blog_index(site: &Site<'_>) -> Markup {
    let config = site.config;
    let description = format!("Articles and notes by {}.", config.author.name);
    let mut meta = PageMeta::new(site, Some("Blog"), &description, "/blog".to_string());
    meta.schemas = vec![breadcrumb(site, &[("Blog", "/blog")])];

    let content = html! {
        main.blog-page {
            h1 { "Blog" }
            @if site.manifest.posts.is_empty() {
                p.empty { "No posts yet." }
            }
            @for post in &site.manifest.posts {
                (post_summary(post))
            }
        }
    };

    base_document(site, &meta, Section::Blog, content)
}

fn render_post(site: &Site<'_>, post: &Post) -> Markup {
    let config = site.config;
    let path = format!("/blog/{}", post.slug);
    let page_url = site.url(&path);
    let mut meta = PageMeta::new(site, Some(&post.title), &post.excerpt, path.clone());
    meta.og_type = "article";
    meta.published = Some(post.date);
    if let Some(image) = post.image.as_deref() {
        meta.image = Some(image);
    }
    meta.schemas = vec![
        seo::article_schema(config, post),
        breadcrumb(site, &[("Blog", "/blog"), (post.title.as_str(), path.as_str())]),
    ];
    meta.schemas.extend(
        feeds::video_entries(config, std::slice::from_ref(post), &[])
            .iter()
            .map(|entry| video::video_object_schema(config, &entry.metadata(), &page_url)),
    );

    let content = html! {
        main.post-page {
            article.post {
                header.post-header {
                    p.back { a href="/blog" { "← Blog" } }
                    h1 { (post.title) }
                    (post_meta_line(post))
                    (tag_list(&post.tags))
                }
                @if let Some(image) = &post.image {
                    figure.cover { (media(image, &post.title)) }
                }
                div.post-body {
                    (render::document(&post.content))
                }
            }
        }
    };

    base_document(site, &meta, Section::Blog, content)
}

fn render_projects_index(site: &Site<'_>) -> Markup {
    let config = site.config;
    let description = format!("Selected projects by {}.", config.author.name);
    let mut meta = PageMeta::new(site, Some("Projects"), &description, "/projects".to_string());
    meta.schemas = vec![breadcrumb(site, &[("Projects", "/projects")])];

    let content = html! {
        main.projects-page {
            h1 { "Projects" }
            @if site.manifest.projects.is_empty() {
                p.empty { "No projects yet." }
            }
            div.project-grid {
                @for project in &site.manifest.projects {
                    (project_card(project))
                }
            }
        }
    };

    base_document(site, &meta, Section::Projects, content)
}

fn render_project(site: &Site<'_>, project: &Project) -> Markup {
    let config = site.config;
    let path = format!("/projects/{}", project.slug);
    let page_url = site.url(&path);
    let mut meta = PageMeta::new(site, Some(&project.title), &project.excerpt, path.clone());
    if let Some(image) = project.image.as_deref().filter(|u| !video::is_video_url(u)) {
        meta.image = Some(image);
    }
    meta.schemas = vec![breadcrumb(
        site,
        &[("Projects", "/projects"), (project.title.as_str(), path.as_str())],
    )];
    meta.schemas.extend(
        feeds::video_entries(config, &[], std::slice::from_ref(project))
            .iter()
            .map(|entry| video::video_object_schema(config, &entry.metadata(), &page_url)),
    );

    let content = html! {
        main.project-page {
            article.project {
                header.project-header {
                    p.back { a href="/projects" { "← Projects" } }
                    h1 { (project.title) }
                    p.excerpt { (project.excerpt) }
                    p.project-meta {
                        time datetime=(project.date.to_string()) { (project.date.long_form()) }
                        @if let Some(link) = &project.link {
                            " · " a href=(link) target="_blank" rel="noopener noreferrer" { "Live site" }
                        }
                        @if let Some(github) = &project.github {
                            " · " a href=(github) target="_blank" rel="noopener noreferrer" { "Source" }
                        }
                    }
                    (tag_list(&project.technologies))
                }
                @if let Some(image) = &project.image {
                    figure.cover { (media(image, &project.title)) }
                }
                div.project-body {
                    (render::document(&project.description))
                }
                @if !project.challenges.is_empty() {
                    section.challenges {
                        h2 { "Challenges" }
                        ul { @for c in &project.challenges { li { (render::line(c)) } } }
                    }
                }
                @if !project.solutions.is_empty() {
                    section.solutions {
                        h2 { "Solutions" }
                        ul { @for s in &project.solutions { li { (render::line(s)) } } }
                    }
                }
                @if !project.impact.is_empty() {
                    section.impact {
                        h2 { "Impact" }
                        (render::document(&project.impact))
                    }
                }
                @if !project.gallery.is_empty() {
                    section.gallery {
                        h2 { "Gallery" }
                        @for item in &project.gallery {
                            figure {
                                (media(&item.url, &item.caption))
                                @if !item.caption.is_empty() {
                                    figcaption { (item.caption) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(site, &meta, Section::Projects, content)
}

fn render_not_found(site: &Site<'_>) -> Markup {
    let mut meta = PageMeta::new(
        site,
        Some("Page Not Found"),
        "The page you are looking for does not exist.",
        "/404".to_string(),
    );
    meta.noindex = true;

    let content = html! {
        main.not-found-page {
            h1 { "404" }
            p { "The page you are looking for does not exist." }
            ul {
                li { a href="/" { "Home" } }
                li { a href="/blog" { "Blog" } }
                li { a href="/projects" { "Projects" } }
            }
        }
    };

    base_document(site, &meta, Section::None, content)
}

// ============================================================================
// Tests
// ============================================================================
