//! Content loading.
//!
//! Walks the content directory and produces the [`Manifest`] that page
//! generation consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml              # Site configuration (optional)
//! ├── resume.toml              # Home page resume (optional)
//! ├── blog/
//! │   ├── hello-world.md       # Post; slug = file stem
//! │   └── 2024/
//! │       └── legal-agents.md  # Subdirectories are only for organisation
//! ├── projects/
//! │   └── contract-search.toml # Project; slug = file stem
//! └── assets/                  # Copied verbatim to the output root
//!     └── favicon.svg
//! ```
//!
//! ## Posts
//!
//! A post is TOML front matter between `+++` lines, then the markdown-lite
//! body:
//!
//! ```text
//! +++
//! title = "Hello World"
//! date = "2025-01-15"
//! tags = ["rust"]
//! +++
//!
//! First paragraph.
//! ```
//!
//! `title` and `date` are required; `excerpt`, `read_time`, `tags` and
//! `image` are optional. A missing excerpt is taken from the start of the
//! body text, a missing read time from its word count.
//!
//! ## Validation
//!
//! - Front matter must be present and must not contain unknown keys
//! - Slugs must be URL-safe (`lowercase-words-and-digits`)
//! - Two posts (or two projects) may not share a slug

use crate::config::{self, ConfigError, SiteConfig};
use crate::markup;
use crate::seo;
use crate::types::{Post, Project, Resume};
use crate::date::Date;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Words per minute used for derived read times.
const WORDS_PER_MINUTE: usize = 200;

const FRONT_MATTER_DELIMITER: &str = "+++";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{}: missing front matter (expected a block between +++ lines)", .0.display())]
    MissingFrontMatter(PathBuf),
    #[error("{}: '{slug}' is not a valid slug (expected '{expected}')", .path.display())]
    InvalidSlug {
        path: PathBuf,
        slug: String,
        expected: String,
    },
    #[error("Duplicate {kind} slug '{slug}': {} and {}", .first.display(), .second.display())]
    DuplicateSlug {
        kind: &'static str,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Everything the generator needs, loaded from the content directory.
#[derive(Debug)]
pub struct Manifest {
    /// Newest first.
    pub posts: Vec<Post>,
    /// Newest first.
    pub projects: Vec<Project>,
    pub resume: Option<Resume>,
    /// Files under `assets/`, relative to the content root.
    pub assets: Vec<String>,
    pub config: SiteConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    title: String,
    date: Date,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    read_time: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    image: Option<String>,
}

pub fn load(root: &Path) -> Result<Manifest, ContentError> {
    let config = config::load_config(root)?;
    let posts = load_posts(root)?;
    let projects = load_projects(root)?;
    let resume = load_resume(root)?;
    let assets = collect_assets(root)?;

    log::debug!(
        "loaded {} posts, {} projects, {} assets from {}",
        posts.len(),
        projects.len(),
        assets.len(),
        root.display()
    );

    Ok(Manifest {
        posts,
        projects,
        resume,
        assets,
        config,
    })
}

/// Split `+++` front matter from the body.
///
/// Returns `(front_matter, body)`, or `None` when the document does not
/// start with a delimiter line or the block is never closed.
pub fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = source.strip_prefix(FRONT_MATTER_DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            let body = &rest[offset + line.len()..];
            return Some((&rest[..offset], body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }
    None
}

/// `"N min read"` for a body, at least one minute.
pub fn estimate_read_time(blocks: &[markup::Block]) -> String {
    let minutes = markup::word_count(blocks)
        .div_ceil(WORDS_PER_MINUTE)
        .max(1);
    format!("{minutes} min read")
}

/// Parse one post file. `rel_path` is used for the slug and for errors.
pub fn parse_post(source: &str, rel_path: &Path) -> Result<Post, ContentError> {
    let slug = slug_for(rel_path)?;
    let (front, body) = split_front_matter(source)
        .ok_or_else(|| ContentError::MissingFrontMatter(rel_path.to_path_buf()))?;
    let meta: FrontMatter = toml::from_str(front).map_err(|source| ContentError::Toml {
        path: rel_path.to_path_buf(),
        source,
    })?;

    let needs_scan = meta.excerpt.is_none() || meta.read_time.is_none();
    let blocks = if needs_scan {
        markup::scan(body)
    } else {
        Vec::new()
    };
    let excerpt = meta.excerpt.unwrap_or_else(|| {
        seo::meta_description(&markup::plain_text(&blocks), seo::META_DESCRIPTION_LEN)
    });
    let read_time = meta
        .read_time
        .unwrap_or_else(|| estimate_read_time(&blocks));

    Ok(Post {
        slug,
        title: meta.title,
        content: body.to_string(),
        excerpt,
        date: meta.date,
        read_time,
        tags: meta.tags,
        image: meta.image,
        source_path: rel_path.to_string_lossy().to_string(),
    })
}

/// Parse one project file.
pub fn parse_project(source: &str, rel_path: &Path) -> Result<Project, ContentError> {
    let slug = slug_for(rel_path)?;
    let mut project: Project = toml::from_str(source).map_err(|source| ContentError::Toml {
        path: rel_path.to_path_buf(),
        source,
    })?;
    project.slug = slug;
    Ok(project)
}

fn slug_for(rel_path: &Path) -> Result<String, ContentError> {
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let expected = seo::create_slug(&stem);
    if stem.is_empty() || stem != expected {
        return Err(ContentError::InvalidSlug {
            path: rel_path.to_path_buf(),
            slug: stem,
            expected,
        });
    }
    Ok(stem)
}

fn load_posts(root: &Path) -> Result<Vec<Post>, ContentError> {
    let blog_dir = root.join("blog");
    if !blog_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(&blog_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.path()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), "md") {
            continue;
        }
        let rel_path = relative(entry.path(), root);
        let source = fs::read_to_string(entry.path())?;
        let post = parse_post(&source, &rel_path)?;
        log::debug!("post {} ({})", post.slug, post.source_path);
        posts.push(post);
    }

    check_unique("post", posts.iter().map(|p| (&p.slug, &p.source_path)))?;
    posts.sort_by(|a, b| newest_first((a.date, &a.slug), (b.date, &b.slug)));
    Ok(posts)
}

fn load_projects(root: &Path) -> Result<Vec<Project>, ContentError> {
    let projects_dir = root.join("projects");
    if !projects_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(&projects_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && !is_hidden(p) && has_extension(p, "toml"))
        .collect();
    files.sort();

    let mut projects = Vec::new();
    for path in &files {
        let rel_path = relative(path, root);
        let source = fs::read_to_string(path)?;
        let project = parse_project(&source, &rel_path)?;
        log::debug!("project {} ({})", project.slug, rel_path.display());
        projects.push((project, rel_path));
    }

    check_unique(
        "project",
        projects
            .iter()
            .map(|(p, path)| (&p.slug, path.to_string_lossy().to_string())),
    )?;
    let mut projects: Vec<Project> = projects.into_iter().map(|(p, _)| p).collect();
    projects.sort_by(|a, b| newest_first((a.date, &a.slug), (b.date, &b.slug)));
    Ok(projects)
}

fn load_resume(root: &Path) -> Result<Option<Resume>, ContentError> {
    let path = root.join("resume.toml");
    if !path.exists() {
        return Ok(None);
    }
    let source = fs::read_to_string(&path)?;
    let resume = toml::from_str(&source).map_err(|source| ContentError::Toml {
        path: PathBuf::from("resume.toml"),
        source,
    })?;
    Ok(Some(resume))
}

fn collect_assets(root: &Path) -> Result<Vec<String>, ContentError> {
    let assets_dir = root.join("assets");
    if !assets_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut assets = Vec::new();
    for entry in WalkDir::new(&assets_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.path()))
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            assets.push(relative(entry.path(), root).to_string_lossy().to_string());
        }
    }
    Ok(assets)
}

/// Newest date first; equal dates fall back to slug order.
fn newest_first(a: (Date, &String), b: (Date, &String)) -> std::cmp::Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

fn check_unique<'a, P: AsRef<Path>>(
    kind: &'static str,
    items: impl Iterator<Item = (&'a String, P)>,
) -> Result<(), ContentError> {
    let mut seen: HashMap<&'a String, PathBuf> = HashMap::new();
    for (slug, path) in items {
        if let Some(first) = seen.get(slug) {
            return Err(ContentError::DuplicateSlug {
                kind,
                slug: slug.clone(),
                first: first.clone(),
                second: path.as_ref().to_path_buf(),
            });
        }
        seen.insert(slug, path.as_ref().to_path_buf());
    }
    Ok(())
}

fn relative(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
