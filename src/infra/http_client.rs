use crate::app::ports::Transport;
use crate::constants::MAX_BODY_EXCERPT_BYTES;
use crate::error::{ImporterError, Result};
use crate::logging::{default_sink, DiagnosticSink};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const COMPONENT: &str = "http";

pub struct ReqwestTransport {
    client: Client,
    sink: Arc<dyn DiagnosticSink>,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(10))
            .build()
            .map_err(|e| ImporterError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            sink: default_sink(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    fn failed(&self, url: &str, message: String) -> ImporterError {
        self.sink
            .error(COMPONENT, &format!("Failed to download {}: {}", url, message));
        ImporterError::Transport {
            url: url.to_string(),
            message,
        }
    }
}

impl Transport for ReqwestTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.failed(url, classify(&e)))?;
        let status = resp.status();
        let bytes = resp.bytes().map_err(|e| self.failed(url, classify(&e)))?;

        if !status.is_success() {
            let end = bytes.len().min(MAX_BODY_EXCERPT_BYTES);
            let message = format!(
                "Status: {}, Body: {}",
                status.as_u16(),
                String::from_utf8_lossy(&bytes[..end])
            );
            return Err(self.failed(url, message));
        }
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

fn classify(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Network timeout: {}", e)
    } else if e.is_connect() {
        format!("Network error: {}", e)
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{MemorySink, Severity};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn local_transport() -> ReqwestTransport {
        // Keep test traffic away from any proxy configured in the environment
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        ReqwestTransport::with_client(client)
    }

    /// Serves a single canned HTTP response on a random local port
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let mut request = Vec::new();
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/data.jsonl", addr)
    }

    #[test]
    fn test_fetch_success_returns_body() {
        let url = serve_once("HTTP/1.1 200 OK", "{\"id\": 1}\n");
        let transport = local_transport();

        let bytes = transport.fetch(&url).unwrap();

        assert_eq!(bytes, b"{\"id\": 1}\n");
    }

    #[test]
    fn test_non_success_status_is_transport_error() {
        let url = serve_once("HTTP/1.1 404 Not Found", "missing");
        let sink = Arc::new(MemorySink::new());
        let transport = local_transport().with_sink(sink.clone());

        let err = transport.fetch(&url).unwrap_err();

        match err {
            ImporterError::Transport { message, .. } => {
                assert!(message.contains("404"));
                assert!(message.contains("missing"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(sink.count(Severity::Error), 1);
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let transport = local_transport();

        let err = transport
            .fetch(&format!("http://127.0.0.1:{}/x", port))
            .unwrap_err();

        assert!(matches!(err, ImporterError::Transport { .. }));
    }
}
