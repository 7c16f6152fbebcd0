//! Test helpers for common test setup and utilities.
//!
//! Shared catalogs and a fixed reference time so tests do not depend on the
//! wall clock.

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::{Movie, MovieCatalog};

/// Fixed "now" used across tests: 2024-06-01T12:00:00Z.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("reference time should be a valid UTC instant")
}

/// Catalog of `size` movies with ids `1..=size` and release years cycling
/// through 1970..=2023.
pub fn test_catalog(size: usize) -> MovieCatalog {
    let movies = (1..=size as u32)
        .map(|id| Movie::new(id, format!("Test movie {id}"), 1970 + (id as i32 % 54)))
        .collect();
    MovieCatalog::new(movies).expect("test catalog ids should be unique")
}

/// Catalog with one movie released in the given year.
pub fn single_movie_catalog(release_year: i32) -> MovieCatalog {
    MovieCatalog::new(vec![Movie::new(1, "Only movie", release_year)])
        .expect("single movie catalog should be valid")
}
