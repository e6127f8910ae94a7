//! Output write cache for incremental builds.
//!
//! A full build renders every page, feed and asset, but most of them are
//! byte-identical to what is already in the output directory. This module
//! lets the writer skip those files so their modification times stay put
//! and deploy tools that sync by mtime only upload what actually changed.
//!
//! # Design
//!
//! The cache is **content-addressed**: for every output path the manifest
//! stores the SHA-256 of the bytes last written there. A file is skipped
//! when:
//!
//! 1. the previous manifest has an entry for its path with the same hash, and
//! 2. the file still exists on disk.
//!
//! Rendering always runs; only the write is skipped. Each build records a
//! fresh manifest containing exactly the files it produced, so entries for
//! pages that disappeared (e.g. a deleted post) drop out on their own.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<output_dir>/.build-manifest.json`, so
//! it travels with the output directory when that is cached in CI.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `build` to start from an empty manifest: every file
//! is rewritten.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".build-manifest.json";

/// Bump to invalidate every existing manifest.
const MANIFEST_VERSION: u32 = 1;

/// On-disk map from output path (relative, `/`-separated) to content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: BTreeMap<String, String>,
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let content = match fs::read_to_string(manifest_path(output_dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(m) if m.version == MANIFEST_VERSION => m,
            Ok(m) => {
                log::debug!("discarding build manifest version {}", m.version);
                Self::empty()
            }
            Err(e) => {
                log::warn!("ignoring unreadable build manifest: {e}");
                Self::empty()
            }
        }
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(manifest_path(output_dir), json)
    }

    /// Whether `rel_path` was last written with `hash` and is still on disk.
    pub fn is_fresh(&self, rel_path: &str, hash: &str, output_dir: &Path) -> bool {
        self.entries.get(rel_path).is_some_and(|h| h == hash)
            && output_dir.join(rel_path).is_file()
    }

    pub fn insert(&mut self, rel_path: String, hash: String) {
        self.entries.insert(rel_path, hash);
    }
}

/// SHA-256 of a byte slice, as lowercase hex.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// What [`SiteWriter::write`] did with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub written: u32,
    pub unchanged: u32,
}

impl CacheStats {
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.written += 1,
            WriteOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.written + self.unchanged
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unchanged > 0 {
            write!(
                f,
                "{} unchanged, {} written ({} total)",
                self.unchanged,
                self.written,
                self.total()
            )
        } else {
            write!(f, "{} written", self.written)
        }
    }
}

/// Writes files into the output directory, skipping unchanged ones.
pub struct SiteWriter {
    output_dir: PathBuf,
    previous: CacheManifest,
    current: CacheManifest,
    stats: CacheStats,
}

impl SiteWriter {
    /// With `use_cache = false` every file is written.
    pub fn new(output_dir: &Path, use_cache: bool) -> Self {
        let previous = if use_cache {
            CacheManifest::load(output_dir)
        } else {
            CacheManifest::empty()
        };
        Self {
            output_dir: output_dir.to_path_buf(),
            previous,
            current: CacheManifest::empty(),
            stats: CacheStats::default(),
        }
    }

    /// Write `bytes` to `rel_path` unless the same bytes are already there.
    pub fn write(&mut self, rel_path: &str, bytes: &[u8]) -> io::Result<WriteOutcome> {
        let hash = hash_bytes(bytes);
        let outcome = if self.previous.is_fresh(rel_path, &hash, &self.output_dir) {
            log::debug!("unchanged {rel_path}");
            WriteOutcome::Unchanged
        } else {
            let path = self.output_dir.join(rel_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, bytes)?;
            log::debug!("wrote {rel_path}");
            WriteOutcome::Written
        };
        self.current.insert(rel_path.to_string(), hash);
        self.stats.record(outcome);
        Ok(outcome)
    }

    /// Save the manifest of this build and return the final stats.
    pub fn finish(self) -> io::Result<CacheStats> {
        fs::create_dir_all(&self.output_dir)?;
        self.current.save(&self.output_dir)?;
        Ok(self.stats)
    }
}

/// Resolve the cache manifest path for an output directory.
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILENAME)
}
