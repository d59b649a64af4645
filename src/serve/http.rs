// src/serve/http.rs

//! Minimal static-file HTTP handling.
//!
//! The dev server speaks just enough HTTP/1.1 to serve a client directory:
//! GET/HEAD, content types by extension, and the two live-reload endpoints.
//! Websocket upgrades are detected by peeking so the request reaches
//! tungstenite unconsumed.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::serve::livereload::{self, ReloadHandle};

const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// Handle one accepted connection: websocket clients are handed to the
/// live-reload endpoint, everything else is static file serving.
pub async fn handle_connection(
    mut stream: TcpStream,
    base_dir: &Path,
    reload: ReloadHandle,
) -> Result<()> {
    let mut peek_buf = [0u8; 1024];
    let n = stream.peek(&mut peek_buf).await.context("peeking request")?;
    let peeked = String::from_utf8_lossy(&peek_buf[..n]);

    if request_target(&peeked) == Some(livereload::WS_PATH) {
        return livereload::serve_ws_client(stream, reload).await;
    }

    let head = read_request_head(&mut stream).await?;
    let (method, target) = parse_request_line(&head)?;
    debug!(method, target, "request");

    let response = match method {
        "GET" | "HEAD" => respond(base_dir, target, method == "HEAD").await,
        _ => Response::method_not_allowed(),
    };
    response.write_to(&mut stream).await
}

/// Build the response for a GET/HEAD request.
async fn respond(base_dir: &Path, target: &str, head_only: bool) -> Response {
    let path = match target.split('?').next() {
        Some(p) => p,
        None => target,
    };

    if path == livereload::SCRIPT_PATH {
        return Response::ok(
            "application/javascript",
            livereload::CLIENT_SCRIPT.as_bytes().to_vec(),
            head_only,
        );
    }

    let Some(rel) = sanitize_target(path) else {
        return Response::not_found(head_only);
    };

    let mut file_path = base_dir.join(rel);
    if file_path.is_dir() {
        file_path = file_path.join("index.html");
    }

    match tokio::fs::read(&file_path).await {
        Ok(body) => {
            let content_type = content_type_for(&file_path);
            if content_type.starts_with("text/html") {
                let html = String::from_utf8_lossy(&body);
                let injected = inject_livereload_script(&html);
                Response::ok(content_type, injected.into_bytes(), head_only)
            } else {
                Response::ok(content_type, body, head_only)
            }
        }
        Err(e) => {
            debug!(path = ?file_path, error = %e, "file not served");
            Response::not_found(head_only)
        }
    }
}

/// Map a request path to a safe path relative to the served directory.
///
/// `/` maps to `index.html`; any `..` component is rejected.
fn sanitize_target(path: &str) -> Option<String> {
    let path = path.strip_prefix('/')?;
    if path.split('/').any(|seg| seg == "..") {
        return None;
    }
    if path.is_empty() {
        Some("index.html".to_string())
    } else {
        Some(path.to_string())
    }
}

/// Insert the live-reload script tag before `</body>`, or append it when the
/// document has no closing body tag.
pub fn inject_livereload_script(html: &str) -> String {
    let tag = format!("<script src=\"{}\"></script>", livereload::SCRIPT_PATH);
    match html.rfind("</body>") {
        Some(idx) => format!("{}{}\n{}", &html[..idx], tag, &html[idx..]),
        None => format!("{html}\n{tag}\n"),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// First-line target of a (possibly partial) request head.
fn request_target(head: &str) -> Option<&str> {
    let line = head.lines().next()?;
    let mut parts = line.split_whitespace();
    let _method = parts.next()?;
    let target = parts.next()?;
    target.split('?').next()
}

async fn read_request_head(stream: &mut TcpStream) -> Result<String> {
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 256];
    loop {
        let n = stream.read(&mut chunk).await.context("reading request")?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if buf.len() > MAX_REQUEST_HEAD {
            bail!("request head exceeds {MAX_REQUEST_HEAD} bytes");
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn parse_request_line(head: &str) -> Result<(&str, &str)> {
    let line = head.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => Ok((method, target)),
        _ => bail!("malformed request line: {line:?}"),
    }
}

struct Response {
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
    head_only: bool,
}

impl Response {
    fn ok(content_type: &'static str, body: Vec<u8>, head_only: bool) -> Self {
        Self {
            status: "200 OK",
            content_type,
            body,
            head_only,
        }
    }

    fn not_found(head_only: bool) -> Self {
        Self {
            status: "404 Not Found",
            content_type: "text/plain; charset=utf-8",
            body: b"Not Found".to_vec(),
            head_only,
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            status: "405 Method Not Allowed",
            content_type: "text/plain; charset=utf-8",
            body: b"Method Not Allowed".to_vec(),
            head_only: false,
        }
    }

    async fn write_to(self, stream: &mut TcpStream) -> Result<()> {
        let headers = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n",
            self.status,
            self.content_type,
            self.body.len()
        );
        stream.write_all(headers.as_bytes()).await?;
        if !self.head_only {
            stream.write_all(&self.body).await?;
        }
        stream.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injects_before_closing_body_tag() {
        let html = "<html><body><h1>hi</h1></body></html>";
        let out = inject_livereload_script(html);
        let script_at = out.find("/__devloop/livereload.js").unwrap();
        let body_at = out.find("</body>").unwrap();
        assert!(script_at < body_at);
    }

    #[test]
    fn appends_when_no_body_tag() {
        let out = inject_livereload_script("<p>fragment</p>");
        assert!(out.ends_with("<script src=\"/__devloop/livereload.js\"></script>\n"));
    }

    #[test]
    fn sanitize_rejects_traversal() {
        assert_eq!(sanitize_target("/../etc/passwd"), None);
        assert_eq!(sanitize_target("/a/../../b"), None);
        assert_eq!(sanitize_target("/"), Some("index.html".to_string()));
        assert_eq!(sanitize_target("/app.js"), Some("app.js".to_string()));
    }

    #[test]
    fn request_target_strips_query() {
        assert_eq!(
            request_target("GET /index.html?cache=no HTTP/1.1\r\n"),
            Some("/index.html")
        );
    }
}
