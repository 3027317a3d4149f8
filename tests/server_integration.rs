//! Integration tests for the local dev server

use bannergen::DevServer;
use std::fs;
use std::path::Path;

fn write_site(dir: &Path) {
    fs::write(
        dir.join("index.html"),
        r#"<!DOCTYPE html>
<html>
<head><title>Banner</title><link rel="stylesheet" href="banner.css"></head>
<body><h1>Hello from the dev server</h1></body>
</html>"#,
    )
    .unwrap();
    fs::write(dir.join("banner.css"), "body { background: transparent; }").unwrap();
}

#[test]
fn test_serves_index_at_root() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let server = DevServer::start(dir.path(), 0).expect("Failed to start server");

    let client = reqwest::blocking::Client::new();
    let response = client.get(server.base_url().as_str()).send().unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "{}", content_type);
    assert!(response.text().unwrap().contains("Hello from the dev server"));

    server.shutdown();
}

#[test]
fn test_content_type_for_css() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let server = DevServer::start(dir.path(), 0).expect("Failed to start server");

    let url = server.base_url().join("banner.css").unwrap();
    let response = reqwest::blocking::get(url).unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/css"), "{}", content_type);

    server.shutdown();
}

#[test]
fn test_missing_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let server = DevServer::start(dir.path(), 0).expect("Failed to start server");

    let url = server.base_url().join("nope.png").unwrap();
    let response = reqwest::blocking::get(url).unwrap();
    assert_eq!(response.status(), 404);

    server.shutdown();
}

#[test]
fn test_non_get_is_405() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let server = DevServer::start(dir.path(), 0).expect("Failed to start server");

    let client = reqwest::blocking::Client::new();
    let response = client.post(server.base_url().as_str()).send().unwrap();
    assert_eq!(response.status(), 405);

    server.shutdown();
}

#[test]
fn test_etag_and_conditional_get() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    let server = DevServer::start(dir.path(), 0).expect("Failed to start server");

    let client = reqwest::blocking::Client::new();
    let first = client.get(server.base_url().as_str()).send().unwrap();
    let etag = first
        .headers()
        .get("ETag")
        .and_then(|v| v.to_str().ok())
        .expect("missing ETag header")
        .to_string();

    let second = client
        .get(server.base_url().as_str())
        .header("If-None-Match", &etag)
        .send()
        .unwrap();
    assert_eq!(second.status(), 304);

    // A stale validator still gets the full body
    let third = client
        .get(server.base_url().as_str())
        .header("If-None-Match", "\"deadbeef\"")
        .send()
        .unwrap();
    assert_eq!(third.status(), 200);

    server.shutdown();
}

#[test]
fn test_port_already_bound_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let first = DevServer::start(dir.path(), 0).expect("Failed to start server");
    let port = first.base_url().port().expect("base URL has no port");

    let second = DevServer::start(dir.path(), port);
    assert!(second.is_err(), "second bind on port {} should fail", port);

    first.shutdown();
}
