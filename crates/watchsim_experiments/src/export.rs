//! Dataset and batch export.
//!
//! Writes a generated dataset to JSON (users with watchlists and reviews) or
//! to a flat review CSV for bulk-loading, and batch summaries to CSV/JSON.

use std::path::Path;

use watchsim_core::{MovieCatalog, SimulationResult};

use crate::runner::BatchOutcome;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export a full dataset to JSON.
///
/// The document holds the reference time, every user (id, credentials,
/// watchlist, watched movies, reviews) and the flat review list.
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_dataset_to_json(
    result: &SimulationResult,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_dataset_impl(result, file)
}

/// Export every review as one CSV row.
///
/// Columns: `user_id,username,movie_id,movie_title,rating,timestamp,text`.
/// Titles are looked up in `catalog`; timestamps are RFC 3339.
///
/// # Errors
///
/// Returns an error if file creation or CSV writing fails.
pub fn export_reviews_to_csv(
    result: &SimulationResult,
    catalog: &MovieCatalog,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    csv::export_reviews_impl(result, catalog, file)
}

/// Export batch outcomes to CSV, one row per run.
///
/// # Errors
///
/// Returns an error if `outcomes` is empty, or if file creation or CSV writing fails.
pub fn export_summaries_to_csv(
    outcomes: &[BatchOutcome],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(outcomes)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_summaries_impl(outcomes, file)
}

/// Export batch outcomes to a JSON array.
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_summaries_to_json(
    outcomes: &[BatchOutcome],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_summaries_impl(outcomes, file)
}
