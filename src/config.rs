//! Site configuration module.
//!
//! Handles loading, validating, and layering `config.toml`. Stock defaults
//! are the base layer; `content/config.toml` overrides any subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Jane Doe"
//! title = "Jane Doe - Software Engineer"
//! description = "Personal site, portfolio and blog."
//! url = "https://example.com"      # absolute, no trailing slash
//! og_image = ""                     # default social preview image
//! twitter_handle = ""               # e.g. "@janedoe"
//! language = "en-US"
//! keywords = []
//!
//! [author]
//! name = "Jane Doe"
//! email = ""
//! image = ""
//! job_title = "Software Engineer"
//! works_for = ""
//! alumni_of = ""
//! linkedin = ""
//! github = ""
//! twitter = ""
//! knows_about = []
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#050914"
//! text_muted = "#6c737f"
//! border = "#eeeff0"
//! link = "#050914"
//! link_hover = "#9ca0a8"
//! code_background = "#f8f9fa"
//!
//! [colors.dark]
//! # same keys, dark defaults
//!
//! [feeds]
//! rss_items = 20        # newest posts included in rss.xml
//!
//! [processing]
//! max_processes = 4     # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [site]
//! url = "https://janedoe.dev"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Identity and canonical URL of the site.
    pub site: SiteInfo,
    /// The person the site is about; feeds JSON-LD and bylines.
    pub author: AuthorConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Feed generation settings.
    pub feeds: FeedsConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.site.url;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "site.url must be an absolute http(s) URL, got '{url}'"
            )));
        }
        if url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.url must not end with '/'".into(),
            ));
        }
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.author.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "author.name must not be empty".into(),
            ));
        }
        if self.feeds.rss_items == 0 {
            return Err(ConfigError::Validation(
                "feeds.rss_items must be at least 1".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Social profile URLs that are set, for `sameAs` lists.
    pub fn social_profiles(&self) -> Vec<&str> {
        [
            &self.author.linkedin,
            &self.author.github,
            &self.author.twitter,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect()
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Short name, used in titles and the web manifest.
    pub name: String,
    /// Full `<title>` of the home page.
    pub title: String,
    /// Default meta description.
    pub description: String,
    /// Canonical origin, e.g. `https://example.com`.
    pub url: String,
    /// Default Open Graph image.
    pub og_image: String,
    /// Twitter/X handle including `@`.
    pub twitter_handle: String,
    /// BCP 47 language tag.
    pub language: String,
    pub keywords: Vec<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Jane Doe".to_string(),
            title: "Jane Doe - Software Engineer".to_string(),
            description: "Personal site, portfolio and blog.".to_string(),
            url: "https://example.com".to_string(),
            og_image: String::new(),
            twitter_handle: String::new(),
            language: "en-US".to_string(),
            keywords: Vec::new(),
        }
    }
}

/// Author details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
    /// Portrait URL.
    pub image: String,
    pub job_title: String,
    /// Current employer.
    pub works_for: String,
    /// School or university.
    pub alumni_of: String,
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
    pub knows_about: Vec<String>,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "Jane Doe".to_string(),
            email: String::new(),
            image: String::new(),
            job_title: "Software Engineer".to_string(),
            works_for: String::new(),
            alumni_of: String::new(),
            linkedin: String::new(),
            github: String::new(),
            twitter: String::new(),
            knows_about: Vec::new(),
        }
    }
}

/// Feed generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedsConfig {
    /// Number of newest posts included in `rss.xml`.
    pub rss_items: usize,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self { rss_items: 20 }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Dates, captions, list bullets.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Code block and inline code background.
    pub code_background: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#050914".to_string(),
            text_muted: "#6c737f".to_string(),
            border: "#eeeff0".to_string(),
            link: "#050914".to_string(),
            link_hover: "#9ca0a8".to_string(),
            code_background: "#f8f9fa".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#050914".to_string(),
            text: "#f8f9fa".to_string(),
            text_muted: "#9ca0a8".to_string(),
            border: "#1f2633".to_string(),
            link: "#f8f9fa".to_string(),
            link_hover: "#ffffff".to_string(),
            code_background: "#0f1624".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock default config as a `toml::Value::Table`, the base layer that
/// `content/config.toml` is merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file at content/config.toml.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Short name: page title suffix, web manifest short_name.
name = "Jane Doe"

# Full title of the home page.
title = "Jane Doe - Software Engineer"

# Default meta description (pages without their own excerpt use this).
description = "Personal site, portfolio and blog."

# Canonical origin. Absolute http(s) URL without a trailing slash.
url = "https://example.com"

# Default Open Graph / Twitter card image.
og_image = ""

# Twitter/X handle, including the @.
twitter_handle = ""

# Content language (BCP 47).
language = "en-US"

keywords = []

# ---------------------------------------------------------------------------
# Author (structured data, bylines)
# ---------------------------------------------------------------------------
[author]
name = "Jane Doe"
email = ""
image = ""
job_title = "Software Engineer"
works_for = ""
alumni_of = ""
linkedin = ""
github = ""
twitter = ""
knows_about = []

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#050914"
text_muted = "#6c737f"    # Dates, captions, bullets
border = "#eeeff0"
link = "#050914"
link_hover = "#9ca0a8"
code_background = "#f8f9fa"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#050914"
text = "#f8f9fa"
text_muted = "#9ca0a8"
border = "#1f2633"
link = "#f8f9fa"
link_hover = "#ffffff"
code_background = "#0f1624"

# ---------------------------------------------------------------------------
# Feeds
# ---------------------------------------------------------------------------
[feeds]
# Number of newest posts included in rss.xml.
rss_items = 20

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = color_variables(&colors.light, "    "),
        dark = color_variables(&colors.dark, "        "),
    )
}

fn color_variables(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
        ("--color-code-bg", &scheme.code_background),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}
