//! Blocking HTTP GET used for the metadata query and the mapping download.
//!
//! Uses the curl crate (libcurl). Every call runs in the current thread;
//! call from `spawn_blocking` if used from async code.

mod error;

pub use error::FetchError;

use std::time::Duration;

/// Upper bound on connection setup, independent of the overall timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Source of raw response bodies. The resolver only depends on this trait,
/// so tests can substitute an in-memory transport.
pub trait Transport {
    /// GET `url` and return the whole body. Non-2xx statuses are errors.
    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// libcurl-backed transport. Follows redirects.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

impl Transport for CurlTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(CONNECT_TIMEOUT.min(timeout))?;
        easy.timeout(timeout)?;
        easy.useragent(concat!("usmap/", env!("CARGO_PKG_VERSION")))?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        tracing::debug!(url, bytes = body.len(), "GET complete");
        Ok(body)
    }
}
