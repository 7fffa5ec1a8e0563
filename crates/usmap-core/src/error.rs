//! Failure taxonomy for mapping acquisition.

use crate::fetch::FetchError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a resolution attempt failed.
///
/// Everything except `NoCacheAvailable` is recovered by falling back to the
/// local cache; see [`crate::MappingsResolver::acquire`].
#[derive(Debug, Error)]
pub enum Failure {
    /// Metadata request failed, returned non-2xx, or returned an empty body.
    #[error("metadata request to {url} failed: {reason}")]
    Network { url: String, reason: NetworkReason },

    /// Metadata body did not have the required shape.
    #[error("malformed metadata response: {0}")]
    MalformedResponse(String),

    /// Mapping download failed or returned no bytes.
    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: NetworkReason },

    /// Downloaded bytes could not be written to the cache.
    #[error("failed to store {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No cached mapping file exists to fall back to.
    #[error("no cached mappings available in {}", .dir.display())]
    NoCacheAvailable { dir: PathBuf },
}

/// Network-side cause shared by [`Failure::Network`] and [`Failure::Download`].
#[derive(Debug, Error)]
pub enum NetworkReason {
    #[error(transparent)]
    Transport(#[from] FetchError),
    #[error("empty response body")]
    EmptyBody,
}
