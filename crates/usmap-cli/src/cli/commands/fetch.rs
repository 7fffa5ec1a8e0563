//! `usmap fetch` – acquire the current mapping file.

use anyhow::{Context, Result};
use usmap_core::{Acquisition, MappingsResolver, ResolverSettings, Source};

/// Run acquisition on the blocking pool and print the resolved path.
pub async fn run_fetch(settings: ResolverSettings, offline: bool) -> Result<()> {
    let acquisition = tokio::task::spawn_blocking(move || {
        let resolver = MappingsResolver::new(settings);
        if offline {
            resolver.select_cached()
        } else {
            resolver.acquire()
        }
    })
    .await
    .context("mappings task panicked")?
    .context("no mappings available")?;

    println!("{}", describe(&acquisition));
    Ok(())
}

fn describe(acquisition: &Acquisition) -> String {
    let origin = match &acquisition.source {
        Source::Remote {
            version,
            downloaded: true,
        } => format!("downloaded {}", version),
        Source::Remote {
            version,
            downloaded: false,
        } => format!("cached {}", version),
        Source::Cache => "fallback to newest cached file".to_string(),
    };
    format!("{}\t({})", acquisition.path.display(), origin)
}
