use crate::feed::{decode_catalog, decode_reviews, CatalogEntry, ReviewEntry};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the content API
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection failure, timeout or truncated body
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("received non-200 status code {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// Client for the catalog and review feeds
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    catalog_url: String,
    reviews_base_url: String,
}

impl UpstreamClient {
    /// Creates a client whose requests all share `timeout`
    pub fn new(
        catalog_url: impl Into<String>,
        reviews_base_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, catalog_url, reviews_base_url))
    }

    /// Creates a client around an existing HTTP client
    pub fn with_client(
        http: Client,
        catalog_url: impl Into<String>,
        reviews_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            catalog_url: catalog_url.into(),
            reviews_base_url: reviews_base_url.into(),
        }
    }

    /// Most recent first, first page only
    pub fn reviews_url(&self, app_id: &str) -> String {
        format!(
            "{}/id={}/sortBy=mostRecent/page=1/json",
            self.reviews_base_url.trim_end_matches('/'),
            app_id
        )
    }

    pub async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, UpstreamError> {
        let url = &self.catalog_url;
        tracing::info!("Fetching apps from {}", url);

        let body = self.get(url).await?;
        let entries = decode_catalog(&body).map_err(|source| UpstreamError::Decode {
            url: url.clone(),
            source,
        })?;

        tracing::info!("Fetched {} apps from upstream", entries.len());
        Ok(entries)
    }

    pub async fn fetch_reviews(&self, app_id: &str) -> Result<Vec<ReviewEntry>, UpstreamError> {
        let url = self.reviews_url(app_id);
        tracing::info!("Fetching reviews for app {} from {}", app_id, url);

        let body = self.get(&url).await?;
        let reviews = decode_reviews(&body).map_err(|source| UpstreamError::Decode {
            url: url.clone(),
            source,
        })?;

        tracing::info!(
            "Fetched {} reviews for app {} from upstream",
            reviews.len(),
            app_id
        );
        Ok(reviews)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        let transport = |source| UpstreamError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_upstream, test_client, CATALOG_FIXTURE};
    use axum::{http::Uri, routing::get, Router};

    #[test]
    fn test_reviews_url() {
        let client = UpstreamClient::with_client(
            Client::new(),
            "https://example.com/apps",
            "https://example.com/rss/customerreviews/",
        );

        assert_eq!(
            client.reviews_url("284882215"),
            "https://example.com/rss/customerreviews/id=284882215/sortBy=mostRecent/page=1/json"
        );
    }

    #[tokio::test]
    async fn test_fetch_catalog() {
        let base = spawn_upstream(
            Router::new().route("/apps", get(|| async { CATALOG_FIXTURE })),
        )
        .await;
        let client = test_client(&base);

        let entries = client.fetch_catalog().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name.label, "Test App 1");
    }

    #[tokio::test]
    async fn test_fetch_reviews_hits_app_path() {
        let base = spawn_upstream(Router::new().fallback(|uri: Uri| async move {
            if uri.path() == "/reviews/id=123/sortBy=mostRecent/page=1/json" {
                r#"{"feed": {"entry": [{"id": {"label": "r1"}, "im:rating": {"label": "4"}}]}}"#
            } else {
                r#"{"feed": {}}"#
            }
        }))
        .await;
        let client = test_client(&base);

        let reviews = client.fetch_reviews("123").await.unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id.label, "r1");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let base = spawn_upstream(Router::new()).await;
        let client = test_client(&base);

        let err = client.fetch_catalog().await.unwrap_err();

        assert!(matches!(
            err,
            UpstreamError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_payload() {
        let base = spawn_upstream(
            Router::new().route("/apps", get(|| async { r#"{"feed": {"entry": "invalid"}}"# })),
        )
        .await;
        let client = test_client(&base);

        let err = client.fetch_catalog().await.unwrap_err();

        assert!(matches!(err, UpstreamError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = test_client(&format!("http://{}", addr));

        let err = client.fetch_catalog().await.unwrap_err();

        assert!(matches!(err, UpstreamError::Transport { .. }));
    }
}
