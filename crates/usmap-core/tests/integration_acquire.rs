//! Integration test: acquire-or-fallback against a local HTTP server via libcurl.
//!
//! Covers fresh download, reuse of a cached version, fallback on refused and
//! stalled metadata requests, malformed metadata, and failed downloads.

mod common;

use common::mapping_server::{refused_url, MappingServer, Route};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tempfile::tempdir;
use usmap_core::{Failure, MappingsResolver, ResolverSettings, Source};

const METADATA_PATH: &str = "/svc/api/v1/fortnite/mappings";

fn settings(endpoint: String, dir: &Path) -> ResolverSettings {
    let mut s = ResolverSettings::new(endpoint, dir);
    s.metadata_timeout = Duration::from_millis(500);
    s.download_timeout = Duration::from_secs(5);
    s
}

fn cached(dir: &Path, name: &str, secs_ago: u64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, name.as_bytes()).unwrap();
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
        .unwrap();
    path
}

fn metadata(server: &MappingServer, file_path: &str) -> String {
    format!(
        r#"{{"version":"v1","mappings":{{"ZStandard":"{}"}}}}"#,
        server.url(file_path)
    )
}

#[test]
fn downloads_new_version_into_cache() {
    let server = MappingServer::start();
    let body: Vec<u8> = (0u8..=255).cycle().take(32 * 1024).collect();
    server.ok(METADATA_PATH, metadata(&server, "/files/a.usmap"));
    server.ok("/files/a.usmap", body.clone());

    let dir = tempdir().unwrap();
    let resolver = MappingsResolver::new(settings(server.url(METADATA_PATH), dir.path()));
    let acquisition = resolver.acquire().expect("acquire");

    assert!(acquisition.path.ends_with("a.usmap"));
    assert_eq!(fs::read(&acquisition.path).unwrap(), body);
    assert_eq!(
        acquisition.source,
        Source::Remote {
            version: "v1".into(),
            downloaded: true
        }
    );
    assert_eq!(server.hits(METADATA_PATH), 1);
    assert_eq!(server.hits("/files/a.usmap"), 1);
}

#[test]
fn second_call_reuses_cached_version() {
    let server = MappingServer::start();
    server.ok(METADATA_PATH, metadata(&server, "/files/b.usmap"));
    server.ok("/files/b.usmap", b"mapping".to_vec());

    let dir = tempdir().unwrap();
    let resolver = MappingsResolver::new(settings(server.url(METADATA_PATH), dir.path()));
    let first = resolver.acquire().unwrap();
    let second = resolver.acquire().unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(server.hits(METADATA_PATH), 2);
    assert_eq!(server.hits("/files/b.usmap"), 1);
}

#[test]
fn refused_metadata_falls_back_to_newest() {
    let dir = tempdir().unwrap();
    cached(dir.path(), "old.usmap", 3600);
    let newest = cached(dir.path(), "new.usmap", 5);

    let resolver = MappingsResolver::new(settings(refused_url(), dir.path()));
    let acquisition = resolver.acquire().unwrap();
    assert_eq!(acquisition.path, newest);
    assert_eq!(acquisition.source, Source::Cache);
}

#[test]
fn stalled_metadata_times_out_and_falls_back() {
    let server = MappingServer::start();
    server.route(METADATA_PATH, Route::Stall);

    let dir = tempdir().unwrap();
    cached(dir.path(), "old.usmap", 3600);
    let newest = cached(dir.path(), "new.usmap", 5);

    let resolver = MappingsResolver::new(settings(server.url(METADATA_PATH), dir.path()));
    let started = Instant::now();
    let acquisition = resolver.acquire().unwrap();
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(acquisition.path, newest);
}

#[test]
fn stalled_metadata_with_empty_cache_is_not_found() {
    let server = MappingServer::start();
    server.route(METADATA_PATH, Route::Stall);

    let dir = tempdir().unwrap();
    let resolver = MappingsResolver::new(settings(server.url(METADATA_PATH), dir.path()));
    assert!(matches!(
        resolver.acquire(),
        Err(Failure::NoCacheAvailable { .. })
    ));
    assert_eq!(resolver.acquire_path(), (PathBuf::new(), false));
}

#[test]
fn malformed_metadata_falls_back_without_download() {
    let server = MappingServer::start();
    server.ok(
        METADATA_PATH,
        format!(
            r#"{{"version":"v2","mappings":{{"Oodle":"{}"}}}}"#,
            server.url("/files/c.usmap")
        ),
    );
    server.ok("/files/c.usmap", b"mapping".to_vec());

    let dir = tempdir().unwrap();
    let fallback = cached(dir.path(), "prev.usmap", 60);
    let resolver = MappingsResolver::new(settings(server.url(METADATA_PATH), dir.path()));

    assert_eq!(resolver.acquire().unwrap().path, fallback);
    assert_eq!(server.hits("/files/c.usmap"), 0);
}

#[test]
fn metadata_server_error_falls_back() {
    let server = MappingServer::start();
    server.route(
        METADATA_PATH,
        Route::Respond {
            status: 503,
            body: b"{}".to_vec(),
        },
    );

    let dir = tempdir().unwrap();
    let fallback = cached(dir.path(), "prev.usmap", 60);
    let resolver = MappingsResolver::new(settings(server.url(METADATA_PATH), dir.path()));

    assert!(matches!(resolver.resolve(), Err(Failure::Network { .. })));
    assert_eq!(resolver.acquire().unwrap().path, fallback);
}

#[test]
fn missing_download_falls_back_and_leaves_no_file() {
    let server = MappingServer::start();
    server.ok(METADATA_PATH, metadata(&server, "/files/gone.usmap"));

    let dir = tempdir().unwrap();
    let fallback = cached(dir.path(), "prev.usmap", 60);
    let resolver = MappingsResolver::new(settings(server.url(METADATA_PATH), dir.path()));

    assert!(matches!(resolver.resolve(), Err(Failure::Download { .. })));
    assert_eq!(resolver.acquire().unwrap().path, fallback);
    assert!(!dir.path().join("gone.usmap").exists());
}
