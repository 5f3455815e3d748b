use serde::{Deserialize, Serialize};

/// Public shape of one app (output for /app/list)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub id: String,
    pub app_id: String,
    pub bundle_id: String,
    pub author: String,
    pub release_date: String,
    pub name: String,
    pub category: String,
    pub artwork_url: String,
    pub url: String,
    pub summary: String,
    pub price: String,
    pub rights: String,
    pub title: String,
}

/// Public shape of one review (output for /app/reviews)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: String,
    pub content: String,
    pub author: String,
    pub score: i32,
    /// Upstream timestamp, passed through unconverted
    pub time: String,
}

/// Body of /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}
