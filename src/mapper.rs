use crate::feed::{CatalogEntry, ReviewEntry};
use crate::models::{CatalogResponse, ReviewResponse};
use std::num::ParseIntError;
use thiserror::Error;

const CANONICAL_REL: &str = "alternate";
const CANONICAL_TYPE: &str = "text/html";

/// A review whose rating label is not an integer
#[derive(Debug, Error)]
#[error("failed to convert rating {rating:?} of review {review_id} to integer: {source}")]
pub struct ConversionError {
    pub review_id: String,
    pub rating: String,
    #[source]
    pub source: ParseIntError,
}

/// What to do with a review whose rating cannot be converted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingPolicy {
    /// Fail the whole batch on the first bad rating
    #[default]
    AbortBatch,
    /// Drop the offending review and keep the rest
    SkipReview,
}

impl CatalogEntry {
    /// First artwork variant, or empty if the entry has none
    pub fn artwork_url(&self) -> &str {
        self.images
            .first()
            .map(|image| image.label.as_str())
            .unwrap_or_default()
    }

    /// Store page URL: the first `alternate` link served as HTML
    pub fn canonical_url(&self) -> &str {
        self.links
            .iter()
            .find(|link| {
                link.attributes.rel == CANONICAL_REL && link.attributes.media_type == CANONICAL_TYPE
            })
            .map(|link| link.attributes.href.as_str())
            .unwrap_or_default()
    }
}

impl From<&CatalogEntry> for CatalogResponse {
    fn from(entry: &CatalogEntry) -> Self {
        let id = &entry.id.attributes;

        CatalogResponse {
            id: id.id.clone(),
            app_id: id.id.clone(),
            bundle_id: id.bundle_id.clone(),
            author: entry.artist.label.clone(),
            release_date: entry.release_date.attributes.label.clone(),
            name: entry.name.label.clone(),
            category: entry.category.attributes.label.clone(),
            artwork_url: entry.artwork_url().to_string(),
            url: entry.canonical_url().to_string(),
            summary: entry.summary.label.clone(),
            price: entry.price.label.clone(),
            rights: entry.rights.label.clone(),
            title: entry.title.label.clone(),
        }
    }
}

impl TryFrom<&ReviewEntry> for ReviewResponse {
    type Error = ConversionError;

    fn try_from(entry: &ReviewEntry) -> Result<Self, Self::Error> {
        let score = entry
            .rating
            .label
            .parse::<i32>()
            .map_err(|source| ConversionError {
                review_id: entry.id.label.clone(),
                rating: entry.rating.label.clone(),
                source,
            })?;

        Ok(ReviewResponse {
            id: entry.id.label.clone(),
            content: entry.content.label.clone(),
            author: entry.author.name.label.clone(),
            score,
            time: entry.updated.label.clone(),
        })
    }
}

/// Maps a whole catalog, keeping upstream order
pub fn map_catalog(entries: &[CatalogEntry]) -> Vec<CatalogResponse> {
    entries.iter().map(CatalogResponse::from).collect()
}

/// Maps a batch of reviews, applying `policy` to unconvertible ratings
pub fn map_reviews(
    entries: &[ReviewEntry],
    policy: RatingPolicy,
) -> Result<Vec<ReviewResponse>, ConversionError> {
    let mut responses = Vec::with_capacity(entries.len());

    for entry in entries {
        match ReviewResponse::try_from(entry) {
            Ok(response) => responses.push(response),
            Err(err) if policy == RatingPolicy::SkipReview => {
                tracing::warn!("Skipping review: {}", err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(responses)
}
