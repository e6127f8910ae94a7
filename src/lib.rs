//! # Simple Folio
//!
//! A minimal static site generator for a personal portfolio: a home page with
//! a resume, a blog, and a project showcase. Content lives in plain files;
//! the output is plain HTML plus the feeds search engines and readers expect.
//!
//! # Architecture: Load, Render, Write
//!
//! ```text
//! 1. Load      content/  →  Manifest          (files → typed records)
//! 2. Render    Manifest  →  pages + feeds     (in memory, in parallel)
//! 3. Write     pages     →  dist/             (skipping unchanged files)
//! ```
//!
//! Rendering is a pure function of the manifest. Nothing in it reads the
//! clock or the filesystem, so the same content always produces byte-identical
//! output and the write cache can skip everything on a rebuild.
//!
//! # Markdown-Lite
//!
//! Post bodies, project descriptions and resume text use a small line-based
//! markup rather than full Markdown. [`markup`] scans a document into blocks
//! (headings, paragraphs, lists, code, quotes, callouts, video embeds) and
//! formats lines into spans (bold, inline code, links). [`render`] turns both
//! into escaped HTML. Anything the scanner does not recognise is text.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Walks the content directory, parses front matter, produces the [`content::Manifest`] |
//! | [`markup`] | Block scanner and inline formatter for markdown-lite |
//! | [`render`] | Blocks and spans to HTML with Maud |
//! | [`generate`] | Page templates, parallel rendering, writing the site |
//! | [`feeds`] | RSS, sitemaps, video sitemap, robots.txt, web manifest |
//! | [`seo`] | JSON-LD schemas, canonical URLs, slugs, meta descriptions |
//! | [`video`] | YouTube and hosted-video metadata |
//! | [`cache`] | Content-hashed write cache for the output directory |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`date`] | Calendar dates in the formats pages and feeds need |
//! | [`types`] | Posts, projects and resume records |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed templates are build errors, template variables are
//! Rust expressions, and all interpolation is auto-escaped, which is what keeps
//! user text from ever becoming markup.
//!
//! ## Deterministic Output
//!
//! The only date on a page that is not a content date is the build date in
//! feeds and the footer. It is taken from the newest post or project rather
//! than the clock.

pub mod cache;
pub mod config;
pub mod content;
pub mod date;
pub mod feeds;
pub mod generate;
pub mod markup;
pub mod output;
pub mod render;
pub mod seo;
pub mod types;
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;
