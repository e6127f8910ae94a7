//! CLI output formatting for the `check` and `build` commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (post,
//! project, page) leads with its positional index and title; filesystem paths
//! follow as indented `Source:` lines or after a `→`. This reads as a content
//! inventory while still letting users trace data back to specific files.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts
//! 001 Hello World (January 15, 2025)
//!     Source: blog/hello-world.md
//!     Tags: rust, web
//!
//! Projects
//! 001 Contract Search (September 1, 2024)
//!     Source: projects/contract-search.toml
//!     Technologies: Rust, Postgres
//!
//! Resume
//!     1 position, 4 skills
//!
//! Assets
//!     assets/favicon.svg
//!
//! Config
//!     https://example.com (en-US)
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Blog → blog/index.html
//!     001 Hello World → blog/hello-world/index.html
//! Projects → projects/index.html
//!     001 Contract Search → projects/contract-search/index.html
//! Not Found → 404.html
//!
//! Feeds
//!     rss.xml (unchanged)
//!     sitemap.xml
//!
//! Built 6 pages, 5 feeds, 1 asset: 4 unchanged, 8 written (12 total)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::cache::WriteOutcome;
use crate::content::Manifest;
use crate::generate::{BuildReport, FileReport, PageKind};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Hello World (January 15, 2025)
/// 002 Notes
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// `"1 post"` / `"3 posts"`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn outcome_suffix(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Written => "",
        WriteOutcome::Unchanged => " (unchanged)",
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the content inventory shown by `check`.
pub fn format_content_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    if manifest.posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            &post.title,
            Some(&post.date.long_form()),
        ));
        lines.push(format!("{}Source: {}", indent(1), post.source_path));
        if !post.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push("Projects".to_string());
    if manifest.projects.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, project) in manifest.projects.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            &project.title,
            Some(&project.date.long_form()),
        ));
        lines.push(format!(
            "{}Source: projects/{}.toml",
            indent(1),
            project.slug
        ));
        if !project.technologies.is_empty() {
            lines.push(format!(
                "{}Technologies: {}",
                indent(1),
                project.technologies.join(", ")
            ));
        }
    }

    lines.push(String::new());
    lines.push("Resume".to_string());
    match &manifest.resume {
        Some(resume) => lines.push(format!(
            "{}{}, {}",
            indent(1),
            plural(resume.experience.len(), "position"),
            plural(resume.skills.len(), "skill")
        )),
        None => lines.push(format!("{}(none)", indent(1))),
    }

    if !manifest.assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for asset in &manifest.assets {
            lines.push(format!("{}{}", indent(1), asset));
        }
    }

    let site = &manifest.config.site;
    lines.push(String::new());
    lines.push("Config".to_string());
    lines.push(format!("{}{} ({})", indent(1), site.url, site.language));

    lines
}

/// Print check output to stdout.
pub fn print_content_output(manifest: &Manifest) {
    for line in format_content_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the result of a build.
///
/// Posts and projects are listed under their index page with positional
/// indices, in the order they were rendered.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut position = 0;

    for page in &report.pages {
        let nested = matches!(page.kind, PageKind::Post | PageKind::Project);
        let label = if nested {
            position += 1;
            format!("{}{}", indent(1), entity_header(position, &page.title, None))
        } else {
            position = 0;
            page.title.clone()
        };
        lines.push(format!(
            "{} \u{2192} {}{}",
            label,
            page.path,
            outcome_suffix(page.outcome)
        ));
    }

    file_section(&mut lines, "Feeds", &report.feeds);
    file_section(&mut lines, "Assets", &report.assets);

    lines.push(String::new());
    lines.push(format!(
        "Built {}, {}, {}: {}",
        plural(report.pages.len(), "page"),
        plural(report.feeds.len(), "feed"),
        plural(report.assets.len(), "asset"),
        report.stats
    ));

    lines
}

fn file_section(lines: &mut Vec<String>, heading: &str, files: &[FileReport]) {
    if files.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_string());
    for file in files {
        lines.push(format!(
            "{}{}{}",
            indent(1),
            file.path,
            outcome_suffix(file.outcome)
        ));
    }
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::generate::PageReport;
    use crate::test_helpers::manifest;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn entity_header_with_detail() {
        assert_eq!(
            entity_header(1, "Hello", Some("January 15, 2025")),
            "001 Hello (January 15, 2025)"
        );
        assert_eq!(entity_header(2, "Notes", None), "002 Notes");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "page"), "1 page");
        assert_eq!(plural(0, "page"), "0 pages");
        assert_eq!(plural(3, "asset"), "3 assets");
    }

    #[test]
    fn content_output_lists_everything() {
        let mut m = manifest();
        m.assets = vec!["assets/favicon.svg".into()];
        let lines = format_content_output(&m);
        assert_eq!(
            lines,
            vec![
                "Posts",
                "001 Hello World (January 15, 2025)",
                "    Source: blog/hello-world.md",
                "    Tags: rust",
                "002 Older Post (June 1, 2024)",
                "    Source: blog/older-post.md",
                "    Tags: rust",
                "",
                "Projects",
                "001 Contract Search (September 1, 2024)",
                "    Source: projects/contract-search.toml",
                "    Technologies: Rust, Postgres",
                "",
                "Resume",
                "    1 position, 1 skill",
                "",
                "Assets",
                "    assets/favicon.svg",
                "",
                "Config",
                "    https://ada.dev (en-US)",
            ]
        );
    }

    #[test]
    fn content_output_marks_empty_sections() {
        let mut m = manifest();
        m.posts.clear();
        m.projects.clear();
        m.resume = None;
        let lines = format_content_output(&m);
        assert_eq!(lines[0..2], ["Posts", "    (none)"]);
        assert!(lines.contains(&"Resume".to_string()));
        assert!(!lines.contains(&"Assets".to_string()));
    }

    fn page(kind: PageKind, title: &str, path: &str, outcome: WriteOutcome) -> PageReport {
        PageReport {
            kind,
            title: title.into(),
            path: path.into(),
            outcome,
        }
    }

    #[test]
    fn build_output_nests_posts_and_projects() {
        let report = BuildReport {
            pages: vec![
                page(PageKind::Home, "Home", "index.html", WriteOutcome::Written),
                page(PageKind::BlogIndex, "Blog", "blog/index.html", WriteOutcome::Written),
                page(PageKind::Post, "Hello", "blog/hello/index.html", WriteOutcome::Unchanged),
                page(PageKind::Post, "Bye", "blog/bye/index.html", WriteOutcome::Written),
                page(PageKind::ProjectsIndex, "Projects", "projects/index.html", WriteOutcome::Written),
                page(PageKind::Project, "Search", "projects/search/index.html", WriteOutcome::Written),
                page(PageKind::NotFound, "Not Found", "404.html", WriteOutcome::Unchanged),
            ],
            feeds: vec![FileReport {
                path: "rss.xml".into(),
                outcome: WriteOutcome::Unchanged,
            }],
            assets: Vec::new(),
            stats: CacheStats {
                written: 5,
                unchanged: 3,
            },
        };
        let lines = format_build_output(&report);
        assert_eq!(
            lines,
            vec![
                "Home \u{2192} index.html",
                "Blog \u{2192} blog/index.html",
                "    001 Hello \u{2192} blog/hello/index.html (unchanged)",
                "    002 Bye \u{2192} blog/bye/index.html",
                "Projects \u{2192} projects/index.html",
                "    001 Search \u{2192} projects/search/index.html",
                "Not Found \u{2192} 404.html (unchanged)",
                "",
                "Feeds",
                "    rss.xml (unchanged)",
                "",
                "Built 7 pages, 1 feed, 0 assets: 3 unchanged, 5 written (8 total)",
            ]
        );
    }
}
