use crate::feed::ReviewEntry;
use chrono::{DateTime, Duration, Utc};

/// Keeps the reviews posted strictly after `now - window_hours`.
///
/// A window of 0 disables the time bound. Reviews whose `updated` timestamp is not
/// RFC3339 are dropped under every window since they cannot be compared.
pub fn filter_recent(
    reviews: Vec<ReviewEntry>,
    window_hours: u64,
    now: DateTime<Utc>,
) -> Vec<ReviewEntry> {
    let cutoff = match window_hours {
        0 => None,
        hours => Some(
            i64::try_from(hours)
                .ok()
                .and_then(Duration::try_hours)
                .and_then(|window| now.checked_sub_signed(window))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        ),
    };

    reviews
        .into_iter()
        .filter(|review| {
            let timestamp = match DateTime::parse_from_rfc3339(&review.updated.label) {
                Ok(timestamp) => timestamp,
                Err(err) => {
                    tracing::debug!(
                        "Skipping review {} with unparseable timestamp {:?}: {}",
                        review.id.label,
                        review.updated.label,
                        err
                    );
                    return false;
                }
            };

            cutoff.map_or(true, |cutoff| timestamp > cutoff)
        })
        .collect()
}
