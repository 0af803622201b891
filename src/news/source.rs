use poll_promise::Promise;
use std::fmt;

use crate::news::snapshot::FeedSnapshot;

/// Why a fetch did not produce a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Connection refused, DNS failure, body read aborted...
    Transport(String),
    /// The server answered with a non-2xx status
    Status(u16),
    /// The body was not a valid feed document
    Decode(String),
    /// The fetch never got the chance to run
    Cancelled,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Transport(msg) => write!(f, "Transport failure: {}", msg),
            FeedError::Status(code) => write!(f, "Feed endpoint returned HTTP {}", code),
            FeedError::Decode(msg) => write!(f, "Malformed feed document: {}", msg),
            FeedError::Cancelled => write!(f, "Fetch cancelled"),
        }
    }
}

impl std::error::Error for FeedError {}

pub type FetchPromise = Promise<Result<FeedSnapshot, FeedError>>;

/// Something that can hand out feed snapshots asynchronously.
///
/// Each call to `request` is exactly one network round trip. The returned
/// promise is polled from the UI thread, so implementations do not need to be
/// `Send`.
pub trait FeedSource {
    fn request(&self) -> FetchPromise;

    /// Where the snapshots come from, for logs and the status line.
    fn describe(&self) -> String;
}

/// `GET <url>` over HTTP via reqwest.
pub struct HttpFeedSource {
    url: String,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl FeedSource for HttpFeedSource {
    fn request(&self) -> FetchPromise {
        let url = self.url.clone();

        #[cfg(not(target_arch = "wasm32"))]
        let promise = Promise::spawn_thread("news_fetch", move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    return Err(FeedError::Transport(format!(
                        "failed to start fetch runtime: {}",
                        e
                    )));
                }
            };
            rt.block_on(fetch_snapshot(url))
        });

        #[cfg(target_arch = "wasm32")]
        let promise = Promise::spawn_local(fetch_snapshot(url));

        promise
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// One round trip. No timeout: staleness is handled by the poller's cache.
pub async fn fetch_snapshot(url: String) -> Result<FeedSnapshot, FeedError> {
    let response = reqwest::get(&url)
        .await
        .map_err(|e| FeedError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FeedError::Transport(e.to_string()))?;

    FeedSnapshot::from_json(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code() {
        assert_eq!(
            FeedError::Status(503).to_string(),
            "Feed endpoint returned HTTP 503"
        );
    }

    /// Answers exactly one request on a loopback port with a canned response.
    #[cfg(not(target_arch = "wasm32"))]
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}/news", addr)
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_success_status_is_reported_with_its_code() {
        let url = serve_once("404 Not Found", "not here");
        let result = HttpFeedSource::new(url).request().block_and_take();
        assert_eq!(result, Err(FeedError::Status(404)));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn success_body_decodes_into_snapshot() {
        let url = serve_once(
            "200 OK",
            r#"{"category":"Tech","feed_name":"Lobsters","items":[{"title":"A","link":"https://a.test","preview":"p"}]}"#,
        );
        let snapshot = HttpFeedSource::new(url).request().block_and_take().unwrap();
        assert_eq!(snapshot.category, "Tech");
        assert_eq!(snapshot.feed_name, "Lobsters");
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].link, "https://a.test");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn html_error_page_with_ok_status_is_a_decode_error() {
        let url = serve_once("200 OK", "<html>maintenance</html>");
        let result = HttpFeedSource::new(url).request().block_and_take();
        assert!(matches!(result, Err(FeedError::Decode(_))), "got {:?}", result);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn refused_connection_is_a_transport_error() {
        // Bind then drop to get a port nobody listens on
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let result = HttpFeedSource::new(format!("http://{}/news", addr))
            .request()
            .block_and_take();
        assert!(matches!(result, Err(FeedError::Transport(_))), "got {:?}", result);
    }
}
