use std::io::Write;

use chrono::SecondsFormat;
use watchsim_core::{MovieCatalog, SimulationResult};

use crate::metrics::DatasetSummary;
use crate::runner::BatchOutcome;

pub(crate) fn export_reviews_impl<W: Write>(
    result: &SimulationResult,
    catalog: &MovieCatalog,
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "user_id",
        "username",
        "movie_id",
        "movie_title",
        "rating",
        "timestamp",
        "text",
    ])?;

    for user in result.users() {
        for review in user.reviews() {
            let title = catalog
                .find(review.movie)
                .map(|movie| movie.title.as_str())
                .unwrap_or_default();
            wtr.write_record([
                review.author.0.to_string().as_str(),
                user.username(),
                review.movie.0.to_string().as_str(),
                title,
                review.rating.to_string().as_str(),
                review
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Micros, true)
                    .as_str(),
                review.text.as_str(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_summaries_impl<W: Write>(
    outcomes: &[BatchOutcome],
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "users",
        "total_watchlisted",
        "mean_watchlist_size",
        "total_watched",
        "total_reviews",
        "mean_rating",
        "review_rate",
        "earliest_review",
        "latest_review",
        "error",
    ])?;

    for outcome in outcomes {
        let summary = outcome.summary.as_ref();
        wtr.write_record([
            outcome.experiment_id.clone(),
            outcome.run_id.to_string(),
            outcome.seed.to_string(),
            summary_field(summary, |s| s.users.to_string()),
            summary_field(summary, |s| s.total_watchlisted.to_string()),
            summary_field(summary, |s| s.mean_watchlist_size.to_string()),
            summary_field(summary, |s| s.total_watched.to_string()),
            summary_field(summary, |s| s.total_reviews.to_string()),
            summary_field(summary, |s| s.mean_rating.to_string()),
            summary_field(summary, |s| s.review_rate().to_string()),
            summary_field(summary, |s| {
                s.earliest_review.map(|t| t.to_rfc3339()).unwrap_or_default()
            }),
            summary_field(summary, |s| {
                s.latest_review.map(|t| t.to_rfc3339()).unwrap_or_default()
            }),
            outcome.error.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Empty for failed runs.
fn summary_field(
    summary: Option<&DatasetSummary>,
    f: impl FnOnce(&DatasetSummary) -> String,
) -> String {
    summary.map(f).unwrap_or_default()
}
