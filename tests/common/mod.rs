#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn tmp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}.json", prefix, uuid::Uuid::new_v4()))
}

pub fn sample_endpoints() -> serde_json::Value {
    serde_json::json!([
        {
            "path": "/v2/droplets",
            "method": "GET",
            "operationId": "droplets_list",
            "summary": "List All Droplets",
            "tags": ["Droplets"],
            "parameters": [
                { "name": "per_page", "in": "query", "type": "integer" },
                { "name": "tag_name", "in": "query", "type": "string" }
            ]
        },
        {
            "path": "/v2/droplets/{droplet_id}",
            "method": "GET",
            "operationId": "droplets_get",
            "summary": "Retrieve an Existing Droplet",
            "description": "Show information about an individual virtual machine.",
            "tags": ["Droplets"],
            "parameters": [
                { "name": "droplet_id", "in": "path", "required": true, "type": "integer" }
            ]
        },
        {
            "path": "/v2/droplets",
            "method": "POST",
            "operationId": "droplets_create",
            "summary": "Create a New Droplet",
            "tags": ["Droplets"],
            "parameters": [
                { "name": "name", "in": "body", "required": true, "type": "string" },
                { "name": "size", "in": "body", "required": true, "type": "string" },
                { "name": "image", "in": "body", "required": true, "type": "string" }
            ]
        },
        {
            "path": "/v2/tags",
            "method": "POST",
            "operationId": "tags_create",
            "summary": "Create a New Tag",
            "tags": ["Tags"],
            "parameters": [
                { "name": "name", "in": "body", "required": true, "type": "string" }
            ]
        }
    ])
}

pub fn write_catalog(prefix: &str, contents: &str) -> PathBuf {
    let path = tmp_path(prefix);
    std::fs::write(&path, contents).expect("write catalog");
    path
}

/// The raw request a `StubServer` received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Answers exactly one HTTP request with a fixed status and body.
pub struct StubServer {
    pub base_url: String,
    received: oneshot::Receiver<RecordedRequest>,
}

impl StubServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let (tx, rx) = oneshot::channel();
        let body = body.to_string();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).await.is_err() {
                return;
            }
            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                    break;
                }
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((key, value)) = line.split_once(':') {
                    let key = key.trim().to_string();
                    let value = value.trim().to_string();
                    if key.eq_ignore_ascii_case("content-length") {
                        content_length = value.parse().unwrap_or(0);
                    }
                    headers.push((key, value));
                }
            }
            let mut raw_body = vec![0u8; content_length];
            if content_length > 0 && reader.read_exact(&mut raw_body).await.is_err() {
                return;
            }

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = write_half.write_all(response.as_bytes()).await;
            let _ = write_half.shutdown().await;
            let _ = tx.send(RecordedRequest {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8_lossy(&raw_body).into_owned(),
            });
        });

        Self {
            base_url: format!("http://{}", addr),
            received: rx,
        }
    }

    pub async fn received(self) -> RecordedRequest {
        self.received.await.expect("stub saw a request")
    }
}

/// A local address with nothing listening on it.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}", addr)
}
