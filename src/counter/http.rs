use serde::Deserialize;

use crate::contracts::{CounterSnapshot, CounterStore, UpstreamError};

#[derive(Debug, Deserialize)]
struct IncrementResponse {
    count: i64,
}

/// Counter store reached through the proxy's `GET /likes` and `POST /like`.
///
/// This is how the plugin sees the counter. No request timeout is set
/// beyond the HTTP client's default.
#[derive(Debug, Clone)]
pub struct HttpCounterStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCounterStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl CounterStore for HttpCounterStore {
    async fn fetch_count(&self) -> Result<CounterSnapshot, UpstreamError> {
        let response = self
            .client
            .get(self.url("/likes"))
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("GET /likes failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Transport(format!(
                "GET /likes returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(format!("Invalid /likes response: {}", e)))
    }

    async fn increment(&self) -> Result<i64, UpstreamError> {
        let response = self
            .client
            .post(self.url("/like"))
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("POST /like failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Transport(format!(
                "POST /like returned HTTP {}",
                response.status()
            )));
        }

        let body: IncrementResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(format!("Invalid /like response: {}", e)))?;
        Ok(body.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trailing_slash() {
        let store = HttpCounterStore::new("http://localhost:3001/api/");
        assert_eq!(store.url("/likes"), "http://localhost:3001/api/likes");
    }
}
