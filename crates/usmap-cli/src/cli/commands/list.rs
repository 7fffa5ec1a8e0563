//! `usmap list` – show cached mapping files, newest first.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, SystemTime};
use usmap_core::cache::MappingCache;

pub fn run_list(dir: &Path) -> Result<()> {
    let cache = MappingCache::new(dir);
    let entries = cache
        .entries()
        .with_context(|| format!("failed to scan {}", dir.display()))?;
    if entries.is_empty() {
        println!("No cached mappings in {}.", dir.display());
        return Ok(());
    }

    let now = SystemTime::now();
    println!("{:<10} {:<10} {}", "AGE", "SIZE", "NAME");
    for e in entries {
        let age = now.duration_since(e.modified).unwrap_or_default();
        println!("{:<10} {:<10} {}", format_age(age), e.len, e.name);
    }
    Ok(())
}

fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86_399 => format!("{}h", secs / 3600),
        _ => format!("{}d", secs / 86_400),
    }
}
