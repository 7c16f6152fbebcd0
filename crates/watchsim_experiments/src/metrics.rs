//! Summary metrics over a generated dataset.

use chrono::{DateTime, Utc};
use watchsim_core::model::MAX_RATING;
use watchsim_core::SimulationResult;

const RATING_BUCKETS: usize = MAX_RATING as usize + 1;

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DatasetSummary {
    /// Number of generated users.
    pub users: usize,
    /// Sum of all watchlist sizes.
    pub total_watchlisted: usize,
    /// Mean watchlist size per user.
    pub mean_watchlist_size: f64,
    /// Total watched movies across users.
    pub total_watched: usize,
    /// Total reviews across users.
    pub total_reviews: usize,
    /// Mean rating over all reviews (0.0 when there are none).
    pub mean_rating: f64,
    /// Review count per rating, indexed by rating.
    pub rating_histogram: [usize; RATING_BUCKETS],
    pub earliest_review: Option<DateTime<Utc>>,
    pub latest_review: Option<DateTime<Utc>>,
    /// Reference "now" of the run.
    pub reference_time: DateTime<Utc>,
}

impl DatasetSummary {
    pub fn from_result(result: &SimulationResult) -> Self {
        let users = result.users().len();
        let total_watchlisted: usize = result.users().iter().map(|u| u.watchlist_size()).sum();
        let total_watched: usize = result.users().iter().map(|u| u.watched().len()).sum();

        let mut rating_histogram = [0usize; RATING_BUCKETS];
        let mut rating_sum = 0u64;
        for review in result.reviews() {
            rating_histogram[review.rating as usize] += 1;
            rating_sum += review.rating as u64;
        }

        let total_reviews = result.reviews().len();
        Self {
            users,
            total_watchlisted,
            mean_watchlist_size: ratio(total_watchlisted as f64, users),
            total_watched,
            total_reviews,
            mean_rating: ratio(rating_sum as f64, total_reviews),
            rating_histogram,
            earliest_review: result.reviews().iter().map(|r| r.timestamp).min(),
            latest_review: result.reviews().iter().map(|r| r.timestamp).max(),
            reference_time: result.reference_time(),
        }
    }

    /// Fraction of watched movies that received a review.
    pub fn review_rate(&self) -> f64 {
        ratio(self.total_reviews as f64, self.total_watched)
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}
