//! TrefleLookupClient - REST implementation of [`PlantLookup`].
//!
//! Talks to a Trefle-compatible plant API:
//! - search: `GET {base}/plants/search?token=..&q=term`
//! - list:   `GET {base}/plants?token=..&<filter pairs>`
//!
//! Both endpoints answer `{"data": [ {plant}, ... ], ...}`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use plantbook_core::config::ApiConfig;
use plantbook_core::error::{PlantbookError, Result};
use plantbook_core::plant::{PlantLookup, PlantRecord};

/// Lookup client that calls the plant API over HTTP.
#[derive(Clone)]
pub struct TrefleLookupClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TrefleLookupClient {
    /// Creates a client with the provided base URL and token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Builds a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlantbookError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    async fn fetch(&self, path: &str, query: Vec<(String, String)>) -> Result<Vec<PlantRecord>> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("[TrefleLookupClient] GET {} ({} query params)", url, query.len());

        let mut params = Vec::with_capacity(query.len() + 1);
        if !self.token.is_empty() {
            params.push(("token".to_string(), self.token.clone()));
        }
        params.extend(query);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|err| PlantbookError::lookup(None, format!("Request to {} failed: {}", url, err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: PlantListResponse = response.json().await.map_err(|err| {
            PlantbookError::lookup(None, format!("Failed to parse plant response: {}", err))
        })?;

        Ok(parsed.data)
    }
}

#[async_trait]
impl PlantLookup for TrefleLookupClient {
    async fn search_plants(&self, term: &str) -> Result<Vec<PlantRecord>> {
        self.fetch("/plants/search", vec![("q".to_string(), term.to_string())])
            .await
    }

    async fn list_plants(&self, filter_token: &str) -> Result<Vec<PlantRecord>> {
        self.fetch("/plants", parse_filter_token(filter_token)).await
    }
}

#[derive(Deserialize)]
struct PlantListResponse {
    #[serde(default)]
    data: Vec<PlantRecord>,
}

/// Splits `a=1&b=2` into query pairs. Pairs without `=` get an empty value.
pub fn parse_filter_token(filter_token: &str) -> Vec<(String, String)> {
    filter_token
        .split('&')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

fn map_http_error(status: StatusCode, body: String) -> PlantbookError {
    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("Plant API rejected the token: {}", body)
        }
        StatusCode::TOO_MANY_REQUESTS => format!("Plant API rate limit reached: {}", body),
        _ => format!("Plant API returned {}: {}", status, body),
    };
    PlantbookError::lookup(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned response and hands back the request line.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let text = String::from_utf8_lossy(&request).to_string();
            text.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_parse_filter_token() {
        assert!(parse_filter_token("").is_empty());
        assert_eq!(
            parse_filter_token("filter[vegetable]=true&filter_not[edible_part]=null"),
            vec![
                ("filter[vegetable]".to_string(), "true".to_string()),
                ("filter_not[edible_part]".to_string(), "null".to_string()),
            ]
        );
        assert_eq!(
            parse_filter_token("flag"),
            vec![("flag".to_string(), String::new())]
        );
    }

    #[tokio::test]
    async fn test_search_hits_search_endpoint() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"data":[{"common_name":"Dog rose","scientific_name":"Rosa canina","family":"Rosaceae","genus":"Rosa","image_url":"https://example.org/r.jpg"}]}"#,
        )
        .await;

        let client = TrefleLookupClient::new(base, "secret");
        let plants = client.search_plants("rose").await.unwrap();

        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].common_name, "Dog rose");
        assert_eq!(plants[0].http_image_url, "https://example.org/r.jpg");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /plants/search?"));
        assert!(request_line.contains("token=secret"));
        assert!(request_line.contains("q=rose"));
    }

    #[tokio::test]
    async fn test_list_without_filter_hits_plants_endpoint() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", r#"{"data":[]}"#).await;

        let client = TrefleLookupClient::new(base, "");
        let plants = client.list_plants("").await.unwrap();
        assert!(plants.is_empty());

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /plants"));
        assert!(!request_line.contains("/plants/search"));
        assert!(!request_line.contains("token="));
    }

    #[tokio::test]
    async fn test_http_error_maps_to_lookup_error() {
        let (base, _server) =
            serve_once("HTTP/1.1 401 Unauthorized", r#"{"error":"bad token"}"#).await;

        let client = TrefleLookupClient::new(base, "wrong");
        let err = client.list_plants("").await.unwrap_err();
        match err {
            PlantbookError::Lookup { status, message } => {
                assert_eq!(status, Some(401));
                assert!(message.contains("rejected the token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
