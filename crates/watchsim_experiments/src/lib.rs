//! Batch runs, summaries and export for watch simulations.
//!
//! # Quick Start
//!
//! ```no_run
//! use watchsim_core::{MovieCatalog, SimulationEngine};
//! use watchsim_experiments::{export_summaries_to_csv, run_parallel_batch, ParameterSpace};
//!
//! let catalog = MovieCatalog::from_csv_path("data/movies.csv").unwrap();
//! let engine = SimulationEngine::new(catalog);
//!
//! let sets = ParameterSpace::grid()
//!     .num_users(vec![10, 100])
//!     .max_movies(vec![Some(5), None])
//!     .seeds(vec![1, 2, 3])
//!     .generate();
//!
//! let outcomes = run_parallel_batch(&engine, &sets, None, true).unwrap();
//! export_summaries_to_csv(&outcomes, "summaries.csv").unwrap();
//! ```
//!
//! - [`parameters`]: parameter spaces (grid search, random sampling)
//! - [`runner`]: parallel execution using rayon
//! - [`metrics`]: dataset summaries
//! - [`export`]: JSON/CSV export

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use export::{
    export_dataset_to_json, export_reviews_to_csv, export_summaries_to_csv, export_summaries_to_json,
};
pub use metrics::DatasetSummary;
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_batch, run_parallel_batch_at, run_single_simulation, BatchOutcome};
