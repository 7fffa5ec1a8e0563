//! Local mappings cache.
//!
//! A flat directory of `.usmap` files named after their download URL. Files
//! are never pruned; when the network path fails the most recently written
//! file wins.

use crate::error::Failure;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Extension (without dot) of mapping files, matched case-insensitively.
pub const MAPPING_EXTENSION: &str = "usmap";

/// A mapping file found in the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: SystemTime,
    pub len: u64,
}

/// Handle on the mappings cache directory.
#[derive(Debug, Clone)]
pub struct MappingCache {
    dir: PathBuf,
}

impl MappingCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for a cache filename.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Cached mapping files, newest first. Equal timestamps are ordered by
    /// name, descending. A missing directory is an empty cache; entries that
    /// cannot be read are logged and skipped.
    pub fn entries(&self) -> io::Result<Vec<CacheEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        for dirent in read_dir {
            let path = match dirent {
                Ok(d) => d.path(),
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), "skipping unreadable cache entry: {}", e);
                    continue;
                }
            };
            if !has_mapping_extension(&path) {
                continue;
            }
            // Follows symlinks; dangling links are skipped.
            let meta = match fs::metadata(&path) {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let modified = match meta.modified() {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping mapping without mtime: {}", e);
                    continue;
                }
            };
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            entries.push(CacheEntry {
                name,
                modified,
                len: meta.len(),
                path,
            });
        }

        entries.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(entries)
    }

    /// Path of the most recently modified mapping file.
    pub fn select_most_recent(&self) -> Result<PathBuf, Failure> {
        let entries = self.entries().unwrap_or_else(|e| {
            tracing::warn!(dir = %self.dir.display(), "failed to scan mappings cache: {}", e);
            Vec::new()
        });

        match entries.into_iter().next() {
            Some(entry) => {
                tracing::info!(path = %entry.path.display(), "using cached mappings");
                Ok(entry.path)
            }
            None => {
                tracing::error!(dir = %self.dir.display(), "no cached mappings found");
                Err(Failure::NoCacheAvailable {
                    dir: self.dir.clone(),
                })
            }
        }
    }

    /// Write `bytes` to `name` atomically: a temp file in the cache directory
    /// is synced and then renamed onto the target, so a failed write never
    /// leaves a truncated `.usmap` behind.
    pub fn store(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(name);

        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;

        tracing::debug!(path = %target.display(), bytes = bytes.len(), "stored mappings");
        Ok(target)
    }
}

fn has_mapping_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(MAPPING_EXTENSION))
}
