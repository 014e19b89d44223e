//! Integration tests for MountRush.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mountrush-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_tiers` - override, file, remote and built-in catalog resolution
//! - `shop_flows` - persistence across sessions, checkout, analytics
//! - `admin_flows` - admin changes observed by the shop, sheet import
//!
//! HTTP collaborators are replaced by [`StubServer`], a local listener that
//! answers every request with one canned response.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

/// A one-response HTTP server on an ephemeral localhost port.
#[derive(Debug)]
pub struct StubServer {
    base: Url,
    hits: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Start serving `body` with `status` to every request.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(status: u16, body: impl Into<String>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base = Url::parse(&format!("http://{addr}/")).map_err(io::Error::other)?;

        let body: Arc<str> = Arc::from(body.into());
        let hits = Arc::new(AtomicUsize::new(0));
        let task = tokio::spawn({
            let hits = Arc::clone(&hits);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let body = Arc::clone(&body);
                    let hits = Arc::clone(&hits);
                    tokio::spawn(async move {
                        let _ = respond(stream, status, &body, &hits).await;
                    });
                }
            }
        });

        Ok(Self { base, hits, task })
    }

    /// URL of `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }

    /// Number of complete requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn respond(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    hits: &AtomicUsize,
) -> io::Result<()> {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        request.extend_from_slice(chunk.get(..n).unwrap_or_default());
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(request.get(..header_end).unwrap_or_default())
        .to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while request.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(chunk.get(..n).unwrap_or_default());
    }

    hits.fetch_add(1, Ordering::SeqCst);

    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
