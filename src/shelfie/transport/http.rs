use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{Result, ShelfieError};
use reqwest::blocking::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("shelfie/", env!("CARGO_PKG_VERSION"));

/// Production transport: one blocking `reqwest` client for the whole process.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ShelfieError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| ShelfieError::Network(format!("{} {}: {}", request.method, url, e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ShelfieError::Network(format!("reading body of {}: {}", url, e)))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_and_path() {
        let transport = HttpTransport::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(
            transport.url_for("/api/Book"),
            "http://localhost:5000/api/Book"
        );
        assert_eq!(
            transport.url_for("api/Book"),
            "http://localhost:5000/api/Book"
        );
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        // Port 9 (discard) is closed on every sane test machine.
        let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = transport
            .send(&ApiRequest::new(Method::Get, "/api/Book"))
            .unwrap_err();
        assert!(matches!(err, ShelfieError::Network(_)));
    }
}
