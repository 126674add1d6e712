//! HTTP client for the work log webhook.
//!
//! Uses reqwest with a JSON body and no auth. One attempt per entry, platform
//! default timeouts, response body ignored.

use async_trait::async_trait;
use url::Url;

use crate::types::WorkLogEntry;

/// Errors from a webhook POST.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("Webhook request failed: {0}")]
    Transport(String),
    #[error("Webhook responded with status {0}")]
    Status(u16),
}

/// Delivers one entry to the record store.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn send_entry(&self, entry: &WorkLogEntry) -> Result<(), WebhookError>;
}

pub struct WebhookClient {
    client: reqwest::Client,
    url: Url,
}

impl WebhookClient {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Use a preconfigured reqwest client (proxy or TLS settings).
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl WebhookTransport for WebhookClient {
    async fn send_entry(&self, entry: &WorkLogEntry) -> Result<(), WebhookError> {
        let resp = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .json(entry)
            .send()
            .await
            .map_err(|e| WebhookError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.as_u16()));
        }

        log::debug!("Webhook accepted {} with status {}", entry.entry_id, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn sample_entry() -> WorkLogEntry {
        WorkLogEntry {
            entry_id: "JS-1709251200000".into(),
            date: "2024-03-01".into(),
            executive_id: "EMP003".into(),
            executive_name: "Ali".into(),
            company_name: "Acme".into(),
            product: "SEO Audit".into(),
            status_id: "COMPLETED".into(),
            status_label: "Completed".into(),
            delivery_date: String::new(),
            comments: String::new(),
            website_link: "https://acme.test".into(),
        }
    }

    /// Loopback traffic must not be routed through an ambient HTTP proxy.
    fn loopback_client(url: Url) -> WebhookClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        WebhookClient::with_client(client, url)
    }

    /// Read one HTTP/1.1 request: headers plus `content-length` bytes of body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Loopback stand-in for the webhook: answers one request with `status_line`
    /// and hands back the raw request it received.
    async fn serve_once(status_line: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        let url = Url::parse(&format!("http://{}/webhook/worklog", addr)).unwrap();
        (url, handle)
    }

    #[tokio::test]
    async fn test_send_entry_posts_json() {
        let (url, server) = serve_once("200 OK").await;
        let client = loopback_client(url);

        let result = client.send_entry(&sample_entry()).await;
        assert_eq!(result, Ok(()));

        let request = server.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        let head = head.to_lowercase();
        assert!(head.starts_with("post /webhook/worklog http/1.1"));
        assert!(head.contains("content-type: application/json"));

        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["entryId"], "JS-1709251200000");
        assert_eq!(json["executiveName"], "Ali");
        assert_eq!(json["statusLabel"], "Completed");
        assert_eq!(json["deliveryDate"], "");
        assert_eq!(json.as_object().unwrap().len(), 11);
    }

    #[tokio::test]
    async fn test_any_2xx_is_success() {
        let (url, server) = serve_once("204 No Content").await;
        let client = loopback_client(url);

        assert_eq!(client.send_entry(&sample_entry()).await, Ok(()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let (url, server) = serve_once("500 Internal Server Error").await;
        let client = loopback_client(url);

        let result = client.send_entry(&sample_entry()).await;
        assert_eq!(result, Err(WebhookError::Status(500)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Reserve a port, then release it so nothing is listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/webhook", addr)).unwrap();
        let client = loopback_client(url);

        let result = client.send_entry(&sample_entry()).await;
        assert!(matches!(result, Err(WebhookError::Transport(_))));
    }
}
