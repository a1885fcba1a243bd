//! HTTP execution capability used by the retry executor.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

use crate::error::{PushError, Result};

/// Applied to every request unless the config says otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A fully built request: absolute URL, headers and encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Status and raw body; `body` is `None` when the server sent none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP round-trip, with no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// `Transport` backed by a pooled reqwest client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps an existing reqwest client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with the given overall request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("xmpush/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PushError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PushError::Request(e.to_string()))?;
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| PushError::ReadBody(e.to_string()))?;

        Ok(HttpResponse {
            status,
            body: Some(body.to_vec()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let ok = HttpResponse {
            status: 200,
            body: None,
        };
        assert!(ok.is_success());

        let created = HttpResponse {
            status: 204,
            body: None,
        };
        assert!(created.is_success());

        let err = HttpResponse {
            status: 502,
            body: None,
        };
        assert!(!err.is_success());
    }

    #[tokio::test]
    async fn test_reqwest_transport_post() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", "key=secret")
            .match_body("a=1&b=2")
            .with_status(200)
            .with_body(r#"{"code":0}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::with_timeout(DEFAULT_TIMEOUT).unwrap();
        let response = transport
            .execute(&HttpRequest {
                method: Method::Post,
                url: format!("{}/echo", server.url()),
                headers: vec![("Authorization".to_string(), "key=secret".to_string())],
                body: Some("a=1&b=2".to_string()),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body.as_deref(), Some(&br#"{"code":0}"#[..]));
    }

    #[tokio::test]
    async fn test_reqwest_transport_keeps_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("nope")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Client::new());
        let response = transport
            .execute(&HttpRequest {
                method: Method::Get,
                url: format!("{}/missing", server.url()),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body.as_deref(), Some(&b"nope"[..]));
    }

    #[tokio::test]
    async fn test_reqwest_transport_connection_error() {
        let transport = ReqwestTransport::new(Client::new());
        let result = transport
            .execute(&HttpRequest {
                method: Method::Get,
                url: "http://127.0.0.1:1/unreachable".to_string(),
                headers: Vec::new(),
                body: None,
            })
            .await;

        assert!(matches!(result, Err(PushError::Request(_))));
    }
}
