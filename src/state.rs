use crate::mapper::RatingPolicy;
use crate::upstream::UpstreamClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    /// Catalog snapshot, read before going upstream
    pub apps_cache_file: PathBuf,
    /// Directory for per-app review dumps
    pub reviews_dump_dir: PathBuf,
    pub rating_policy: RatingPolicy,
    /// Version reported by /health
    pub version: Arc<String>,
}
