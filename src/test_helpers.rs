//! Shared test utilities for the simple-folio test suite.
//!
//! Provides in-memory content builders for the rendering and feed tests, and
//! a fixture copy for tests that need a real content directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let m = manifest();
//! let pages = render_pages(&m);
//!
//! let tmp = setup_fixtures();
//! let loaded = content::load(tmp.path()).unwrap();
//! assert_eq!(find_post(&loaded, "hello-world").title, "Hello World");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::content::Manifest;
use crate::date::Date;
use crate::types::{Experience, GalleryItem, Post, Project, Resume};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// In-memory content
// =========================================================================

pub fn date(s: &str) -> Date {
    s.parse().unwrap()
}

pub fn config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.site.name = "Ada".into();
    config.site.title = "Ada Lovelace - Engineer".into();
    config.site.url = "https://ada.dev".into();
    config.author.name = "Ada Lovelace".into();
    config.author.github = "https://github.com/ada".into();
    config
}

pub fn post(slug: &str, date_str: &str, content: &str) -> Post {
    Post {
        slug: slug.into(),
        title: slug.into(),
        content: content.into(),
        excerpt: format!("About {slug}."),
        date: date(date_str),
        read_time: "1 min read".into(),
        tags: vec!["rust".into()],
        image: None,
        source_path: format!("blog/{slug}.md"),
    }
}

pub fn project(slug: &str, date_str: &str) -> Project {
    Project {
        slug: slug.into(),
        title: slug.into(),
        excerpt: format!("About {slug}."),
        description: String::new(),
        technologies: Vec::new(),
        link: None,
        github: None,
        date: date(date_str),
        image: None,
        video_duration: None,
        gallery: Vec::new(),
        challenges: Vec::new(),
        solutions: Vec::new(),
        impact: String::new(),
    }
}

/// A small site: two posts, one project with a demo video, and a resume.
pub fn manifest() -> Manifest {
    let mut hello = post(
        "hello-world",
        "2025-01-15",
        "## Intro\nSome **bold** text.\n\n- one\n- two\n",
    );
    hello.title = "Hello World".into();

    let mut older = post("older-post", "2024-06-01", "Older words.");
    older.title = "Older Post".into();

    let mut search = project("contract-search", "2024-09-01");
    search.title = "Contract Search".into();
    search.excerpt = "Semantic search over contracts.".into();
    search.description = "## Overview\nSearch by meaning, not keywords.".into();
    search.technologies = vec!["Rust".into(), "Postgres".into()];
    search.github = Some("https://github.com/ada/contract-search".into());
    search.image =
        Some("https://res.cloudinary.com/demo/video/upload/v1712/contract-search-demo.mp4".into());
    search.video_duration = Some(75);
    search.challenges = vec!["Indexing with `pgvector`".into()];
    search.solutions = vec!["Batch embeddings".into()];
    search.impact = "Reviews take **minutes**.".into();
    search.gallery = vec![GalleryItem {
        url: "https://res.cloudinary.com/demo/image/upload/v1712/results.png".into(),
        caption: "Results view".into(),
        duration: None,
    }];

    Manifest {
        posts: vec![hello, older],
        projects: vec![search],
        resume: Some(Resume {
            headline: Some("Engineer building search tools.".into()),
            location: Some("London".into()),
            about: Some("I like **engines**.".into()),
            skills: vec!["Rust".into()],
            experience: vec![Experience {
                company: "Analytical Engines Ltd".into(),
                role: "Engineer".into(),
                period: "2023 – Present".into(),
                location: None,
                url: None,
                summary: "Built the difference engine.".into(),
            }],
        }),
        assets: Vec::new(),
        config: config(),
    }
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find a post by slug. Panics with the available slugs if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.posts.iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a project by slug. Panics with the available slugs if not found.
pub fn find_project<'a>(manifest: &'a Manifest, slug: &str) -> &'a Project {
    manifest
        .projects
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.projects.iter().map(|p| p.slug.as_str()).collect();
            panic!("project '{slug}' not found. Available: {slugs:?}")
        })
}

pub fn post_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.posts.iter().map(|p| p.slug.as_str()).collect()
}
