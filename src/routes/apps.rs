use crate::cache::{self, is_valid_path_component};
use crate::error::AppError;
use crate::feed::CatalogEntry;
use crate::filter::filter_recent;
use crate::mapper::{map_catalog, map_reviews};
use crate::models::{CatalogResponse, ReviewResponse};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

/// Serves the app catalog, from the snapshot file when one exists
pub async fn list_apps(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogResponse>>, AppError> {
    tracing::info!("Processing app list request");

    match cache::load::<CatalogEntry>(&state.apps_cache_file) {
        Ok(entries) if !entries.is_empty() => {
            tracing::info!("Loaded {} apps from cache file", entries.len());
            return Ok(Json(map_catalog(&entries)));
        }
        Ok(_) => tracing::debug!("Cache file is empty, fetching from upstream"),
        Err(err) => tracing::debug!("No usable cache ({}), fetching from upstream", err),
    }

    let entries = state.upstream.fetch_catalog().await?;

    match cache::save(&state.apps_cache_file, &entries) {
        Ok(()) => tracing::info!("Saved {} apps to cache file", entries.len()),
        Err(err) => tracing::error!("Failed to save apps to cache file: {}", err),
    }

    let apps = map_catalog(&entries);
    tracing::info!("Returning {} apps", apps.len());
    Ok(Json(apps))
}

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    hours: Option<String>,
}

/// App ids go into the upstream URL path and the dump file name unescaped
fn is_valid_app_id(id: &str) -> bool {
    is_valid_path_component(id)
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

impl ReviewsQuery {
    fn app_id(&self) -> Result<&str, AppError> {
        match self.id.as_deref() {
            None => Err(AppError::MissingAppId),
            Some(id) if id.trim().is_empty() => Err(AppError::MissingAppId),
            Some(id) if !is_valid_app_id(id) => Err(AppError::InvalidAppId(id.to_string())),
            Some(id) => Ok(id),
        }
    }

    /// Recency window; absent or empty means no bound
    ///
    /// Digit strings too large for `u64` saturate, which keeps every review.
    fn window_hours(&self) -> Result<u64, AppError> {
        match self.hours.as_deref() {
            None | Some("") => Ok(0),
            Some(hours) if hours.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(hours.parse::<u64>().unwrap_or(u64::MAX))
            }
            Some(hours) => Err(AppError::InvalidHours(hours.to_string())),
        }
    }
}

/// Serves the reviews of one app, newest upstream page only
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let app_id = query.app_id()?;
    let hours = query.window_hours()?;
    tracing::info!(
        "Processing reviews request for app {} (hours: {})",
        app_id,
        hours
    );

    let reviews = state.upstream.fetch_reviews(app_id).await?;

    let dump_path = cache::review_dump_path(&state.reviews_dump_dir, app_id);
    if let Err(err) = cache::save(&dump_path, &reviews) {
        tracing::warn!("Failed to dump reviews for app {}: {}", app_id, err);
    }

    let total = reviews.len();
    let recent = filter_recent(reviews, hours, Utc::now());
    let responses = map_reviews(&recent, state.rating_policy)?;

    tracing::info!(
        "Returning {} of {} reviews for app {}",
        responses.len(),
        total,
        app_id
    );
    Ok(Json(responses))
}
