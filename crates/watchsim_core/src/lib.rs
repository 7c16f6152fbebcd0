//! Synthetic watch-and-review data for the movie-review application.
//!
//! [`engine::SimulationEngine`] takes a fixed [`catalog::MovieCatalog`] and
//! produces users with watchlists, watch history and timestamped reviews.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod model;
pub mod params;
pub mod sampling;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use catalog::{CatalogError, Movie, MovieCatalog, MovieId};
pub use engine::{SimulationEngine, WatchlistBounds};
pub use error::SimulationError;
pub use model::{Review, SimulatedUser, SimulationResult, UserId};
pub use params::{SimulationParams, TextLength};
