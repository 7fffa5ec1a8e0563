//! Acquire-or-fallback for mapping files.
//!
//! `resolve` asks the metadata endpoint for the current version, reuses a
//! cached copy when one with the same filename exists, and otherwise
//! downloads it. `acquire` wraps that with a single fallback edge to the
//! newest file in the local cache. One metadata request and at most one
//! download per call; no retries.

use crate::cache::MappingCache;
use crate::checksum::sha256_hex;
use crate::config::{UsmapConfig, DEFAULT_COMPRESSION};
use crate::descriptor::MappingDescriptor;
use crate::error::{Failure, NetworkReason};
use crate::fetch::{CurlTransport, Transport};
use crate::url_model::derive_filename;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a resolver needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub endpoint: String,
    pub compression: String,
    pub cache_dir: PathBuf,
    pub metadata_timeout: Duration,
    pub download_timeout: Duration,
}

impl ResolverSettings {
    /// Settings with default compression and timeouts.
    pub fn new(endpoint: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: endpoint.into(),
            compression: DEFAULT_COMPRESSION.to_string(),
            cache_dir: cache_dir.into(),
            metadata_timeout: Duration::from_millis(3000),
            download_timeout: Duration::from_secs(60),
        }
    }

    /// Settings from config, with the cache directory already chosen by the
    /// caller (see [`UsmapConfig::resolved_cache_dir`]).
    pub fn from_config(cfg: &UsmapConfig, cache_dir: PathBuf) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            compression: cfg.compression.clone(),
            cache_dir,
            metadata_timeout: Duration::from_millis(cfg.metadata_timeout_ms),
            download_timeout: Duration::from_secs(cfg.download_timeout_secs),
        }
    }
}

/// Where an acquired mapping file came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The endpoint named this version. `downloaded` is false on a cache hit.
    Remote { version: String, downloaded: bool },
    /// The remote path failed; this is the newest cached file.
    Cache,
}

/// A mapping file ready to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub path: PathBuf,
    pub source: Source,
}

pub struct MappingsResolver<T = CurlTransport> {
    settings: ResolverSettings,
    cache: MappingCache,
    transport: T,
}

impl MappingsResolver<CurlTransport> {
    pub fn new(settings: ResolverSettings) -> Self {
        Self::with_transport(settings, CurlTransport)
    }
}

impl<T: Transport> MappingsResolver<T> {
    pub fn with_transport(settings: ResolverSettings, transport: T) -> Self {
        let cache = MappingCache::new(settings.cache_dir.clone());
        Self {
            settings,
            cache,
            transport,
        }
    }

    pub fn cache(&self) -> &MappingCache {
        &self.cache
    }

    /// Remote path only: query, validate, check cache, download.
    pub fn resolve(&self) -> Result<Acquisition, Failure> {
        let endpoint = &self.settings.endpoint;
        tracing::info!(endpoint = %endpoint, "attempting to retrieve mappings");

        let body = self
            .transport
            .get(endpoint, self.settings.metadata_timeout)
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!(
                        "mappings request timed out after {:?}",
                        self.settings.metadata_timeout
                    );
                } else {
                    tracing::error!("mappings request failed: {}", e);
                }
                Failure::Network {
                    url: endpoint.clone(),
                    reason: e.into(),
                }
            })?;
        if body.is_empty() {
            tracing::error!("mappings request returned an empty body");
            return Err(Failure::Network {
                url: endpoint.clone(),
                reason: NetworkReason::EmptyBody,
            });
        }

        let descriptor = MappingDescriptor::parse(&body, &self.settings.compression)
            .inspect_err(|e| tracing::error!("{}", e))?;
        tracing::debug!(
            version = %descriptor.version,
            url = %descriptor.download_url,
            "mappings metadata received"
        );

        let name = derive_filename(&descriptor.download_url).ok_or_else(|| {
            let f = Failure::MalformedResponse(format!(
                "download URL has no usable filename: {}",
                descriptor.download_url
            ));
            tracing::error!("{}", f);
            f
        })?;

        let path = self.cache.path_for(&name);
        if self.cache.contains(&name) {
            tracing::info!(path = %path.display(), version = %descriptor.version, "mappings already cached");
            return Ok(Acquisition {
                path,
                source: Source::Remote {
                    version: descriptor.version,
                    downloaded: false,
                },
            });
        }

        let url = &descriptor.download_url;
        let bytes = self
            .transport
            .get(url, self.settings.download_timeout)
            .map_err(|e| {
                tracing::error!("mappings download failed: {}", e);
                Failure::Download {
                    url: url.clone(),
                    reason: e.into(),
                }
            })?;
        if bytes.is_empty() {
            tracing::error!(url = %url, "mappings download returned no data");
            return Err(Failure::Download {
                url: url.clone(),
                reason: NetworkReason::EmptyBody,
            });
        }

        let path = self.cache.store(&name, &bytes).map_err(|source| {
            tracing::error!(path = %path.display(), "failed to save mappings: {}", source);
            Failure::Storage {
                path: path.clone(),
                source,
            }
        })?;
        tracing::info!(
            path = %path.display(),
            version = %descriptor.version,
            bytes = bytes.len(),
            sha256 = %sha256_hex(&bytes),
            "downloaded mappings"
        );

        Ok(Acquisition {
            path,
            source: Source::Remote {
                version: descriptor.version,
                downloaded: true,
            },
        })
    }

    /// Remote path, falling back to the newest cached file on any failure.
    /// Only [`Failure::NoCacheAvailable`] is returned as an error.
    pub fn acquire(&self) -> Result<Acquisition, Failure> {
        match self.resolve() {
            Ok(acquisition) => Ok(acquisition),
            Err(failure) => {
                tracing::warn!("falling back to cached mappings after: {}", failure);
                self.select_cached()
            }
        }
    }

    /// Cache-only selection, skipping the network entirely.
    pub fn select_cached(&self) -> Result<Acquisition, Failure> {
        let path = self.cache.select_most_recent()?;
        Ok(Acquisition {
            path,
            source: Source::Cache,
        })
    }

    /// `acquire` flattened to `(path, found)`; the path is empty when not found.
    pub fn acquire_path(&self) -> (PathBuf, bool) {
        match self.acquire() {
            Ok(acquisition) => (acquisition.path, true),
            Err(_) => (PathBuf::new(), false),
        }
    }
}
