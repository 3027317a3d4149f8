//! Local static dev server the banner page is rendered against.
//!
//! The server binds before `start` returns, so the browser can navigate
//! immediately afterwards. Requests are handled on a background thread;
//! `shutdown` (or drop) unblocks the accept loop and joins it.

use crate::{Error, Result};
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use tiny_http::{Header, Method, Request, Response, Server};
use url::Url;

/// A static file server over a site root directory.
pub struct DevServer {
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    base_url: Url,
    root: PathBuf,
}

impl DevServer {
    /// Bind `127.0.0.1:port` (0 picks an ephemeral port) and start serving
    /// `root`.
    pub fn start(root: &Path, port: u16) -> Result<Self> {
        let root = root
            .canonicalize()
            .map_err(|e| Error::ServerError(format!("site root {}: {}", root.display(), e)))?;
        if !root.is_dir() {
            return Err(Error::ServerError(format!(
                "site root {} is not a directory",
                root.display()
            )));
        }

        let server = Server::http(("127.0.0.1", port))
            .map_err(|e| Error::ServerError(format!("failed to bind: {}", e)))?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| Error::ServerError("server has no IP listen address".into()))?;
        let base_url = Url::parse(&format!("http://{}/", addr))
            .map_err(|e| Error::ServerError(format!("invalid base URL: {}", e)))?;

        let server = Arc::new(server);
        let worker = Arc::clone(&server);
        let serve_root = root.clone();
        let handle = std::thread::spawn(move || {
            for request in worker.incoming_requests() {
                handle_request(&serve_root, request);
            }
        });

        debug!("dev server listening on {}", base_url);
        Ok(Self {
            server,
            handle: Some(handle),
            base_url,
            root,
        })
    }

    /// Root URL the browser should navigate to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Directory being served.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stop accepting requests and join the worker thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.server.unblock();
            if handle.join().is_err() {
                warn!("dev server worker panicked during shutdown");
            }
        }
    }
}

impl Drop for DevServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_request(root: &Path, request: Request) {
    let method = request.method().clone();
    let raw_url = request.url().to_string();
    debug!("{} {}", method, raw_url);

    let response = match method {
        Method::Get => serve_path(root, &raw_url, &request),
        _ => Response::from_string("Method Not Allowed").with_status_code(405),
    };

    if let Err(e) = request.respond(response) {
        warn!("failed to respond to {}: {}", raw_url, e);
    }
}

fn serve_path(root: &Path, raw_url: &str, request: &Request) -> Response<std::io::Cursor<Vec<u8>>> {
    let path = raw_url.split('?').next().unwrap_or("/");
    let file = match resolve(root, path) {
        Some(file) => file,
        None => return Response::from_string("Not Found").with_status_code(404),
    };

    let body = match std::fs::read(&file) {
        Ok(body) => body,
        Err(_) => return Response::from_string("Not Found").with_status_code(404),
    };

    let etag = format!("\"{}\"", hex::encode(Sha256::digest(&body)));
    let matched = request
        .headers()
        .iter()
        .any(|h| h.field.equiv("If-None-Match") && h.value.as_str() == etag);
    if matched {
        let mut response = Response::from_data(Vec::new()).with_status_code(304);
        if let Some(h) = header("ETag", &etag) {
            response = response.with_header(h);
        }
        return response;
    }

    let mime = mime_guess::from_path(&file).first_or_octet_stream();
    let mut response = Response::from_data(body);
    if let Some(h) = header("Content-Type", mime.essence_str()) {
        response = response.with_header(h);
    }
    if let Some(h) = header("ETag", &etag) {
        response = response.with_header(h);
    }
    response
}

/// Map a request path to a file under `root`, or `None` when it does not
/// resolve to a regular file inside the root.
fn resolve(root: &Path, path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            // Anything that could climb out of the root is rejected outright
            _ => return None,
        }
    }

    let mut file = root.join(relative);
    if path.ends_with('/') || file.is_dir() {
        file = file.join("index.html");
    }

    // Canonicalize to catch symlinks pointing outside the site root
    let file = file.canonicalize().ok()?;
    if file.starts_with(root) && file.is_file() {
        Some(file)
    } else {
        None
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(h) => Some(h),
        Err(_) => {
            warn!("invalid header {}: {}", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_start_picks_ephemeral_port() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let server = DevServer::start(dir.path(), 0).expect("failed to start server");
        assert_ne!(server.base_url().port(), Some(0));
        server.shutdown();
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = DevServer::start(Path::new("does-not-exist-anywhere"), 0);
        assert!(matches!(result, Err(Error::ServerError(_))));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "x").unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert!(resolve(&root, "/../etc/passwd").is_none());
        assert!(resolve(&root, "/missing.css").is_none());
        assert!(resolve(&root, "/").is_some());
    }
}
