use crate::error::{BrowseError, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::future::Future;
use std::time::Duration;

/// Issues a single GET and hands back the parsed JSON body.
pub trait Transport: Send + Sync {
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<serde_json::Value>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let http = builder.build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrowseError::UpstreamUnavailable(format!(
                "{url} returned {status}"
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| BrowseError::MalformedUpstreamResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpTransport::new("test-agent", 5).is_ok());
        assert!(HttpTransport::new("test-agent", 0).is_ok());
    }

    #[tokio::test]
    async fn test_closed_port_is_upstream_unavailable() {
        let transport = HttpTransport::new("test-agent", 2).unwrap();
        let err = transport
            .fetch_json("http://127.0.0.1:9/stations/tags")
            .await
            .unwrap_err();
        assert!(matches!(err, BrowseError::UpstreamUnavailable(_)));
    }
}
