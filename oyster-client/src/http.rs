//! HTTP client for the external admin API

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::Table;

use crate::{ClientConfig, FetchError, FetchResult};

/// HTTP client for the admin API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET request decoding a JSON response body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Fetch the full table collection
    ///
    /// `GET {base}/admin/tables` answers with a bare JSON array of tables in
    /// server order. No query parameters, no pagination.
    pub async fn fetch_tables(&self) -> FetchResult<Vec<Table>> {
        self.get("/admin/tables").await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> FetchResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.json().await?)
    }
}
