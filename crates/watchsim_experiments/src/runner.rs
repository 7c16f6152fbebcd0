//! Parallel simulation execution using rayon.
//!
//! This module provides functions to run single simulations and execute
//! batches of simulations in parallel against one shared catalog.

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use watchsim_core::{SimulationEngine, SimulationResult};

use crate::metrics::DatasetSummary;
use crate::parameters::ParameterSet;

/// Outcome of one parameter set in a batch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchOutcome {
    pub experiment_id: String,
    pub run_id: usize,
    pub seed: u64,
    /// Present when the run succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DatasetSummary>,
    /// Validation error message when the run was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.summary.is_some()
    }
}

/// Run a single parameter set against `now` and return the full dataset.
pub fn run_single_simulation(
    engine: &SimulationEngine,
    param_set: &ParameterSet,
    now: DateTime<Utc>,
) -> Result<SimulationResult, watchsim_core::SimulationError> {
    engine.simulate_at(&param_set.simulation_params(), now)
}

fn run_to_outcome(engine: &SimulationEngine, param_set: &ParameterSet, now: DateTime<Utc>) -> BatchOutcome {
    let (summary, error) = match run_single_simulation(engine, param_set, now) {
        Ok(result) => (Some(DatasetSummary::from_result(&result)), None),
        Err(err) => {
            tracing::warn!(
                experiment_id = %param_set.experiment_id,
                run_id = param_set.run_id,
                error = %err,
                "simulation run rejected"
            );
            (None, Some(err.to_string()))
        }
    };

    BatchOutcome {
        experiment_id: param_set.experiment_id.clone(),
        run_id: param_set.run_id,
        seed: param_set.seed,
        summary,
        error,
    }
}

/// Run a batch of simulations in parallel.
///
/// All runs share one reference time captured at the start of the batch so
/// their summaries are comparable. Outcomes come back in input order.
///
/// # Arguments
///
/// * `engine` - Engine holding the shared catalog
/// * `parameter_sets` - Parameter sets to run
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
/// * `show_progress` - Whether to display a progress bar
///
/// # Errors
///
/// Returns an error only if the thread pool cannot be built; per-run
/// validation failures are reported inside the outcomes.
pub fn run_parallel_batch(
    engine: &SimulationEngine,
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<BatchOutcome>, rayon::ThreadPoolBuildError> {
    run_parallel_batch_at(engine, parameter_sets, num_threads, show_progress, Utc::now())
}

/// Like [`run_parallel_batch`] with an explicit reference time.
pub fn run_parallel_batch_at(
    engine: &SimulationEngine,
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
    show_progress: bool,
    now: DateTime<Utc>,
) -> Result<Vec<BatchOutcome>, rayon::ThreadPoolBuildError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    tracing::info!(runs = total, threads = pool.current_num_threads(), "running simulation batch");

    let pb_clone = pb.clone();
    let outcomes: Vec<BatchOutcome> = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let outcome = run_to_outcome(engine, param_set, now);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                outcome
            })
            .collect()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;
    use watchsim_core::test_helpers::{reference_time, test_catalog};
    use watchsim_core::SimulationParams;

    #[test]
    fn test_single_simulation() {
        let engine = SimulationEngine::new(test_catalog(10));
        let sets = ParameterSpace::grid().num_users(vec![7]).generate();
        let result = run_single_simulation(&engine, &sets[0], reference_time()).unwrap();
        assert_eq!(result.users().len(), 7);
        assert_eq!(result.reference_time(), reference_time());
    }

    #[test]
    fn test_parallel_batch() {
        let engine = SimulationEngine::new(test_catalog(25));
        let sets = ParameterSpace::grid()
            .num_users(vec![5, 10])
            .max_movies(vec![Some(3), None])
            .generate();
        let outcomes = run_parallel_batch_at(&engine, &sets, Some(2), false, reference_time()).unwrap();

        assert_eq!(outcomes.len(), 4);
        for (outcome, set) in outcomes.iter().zip(&sets) {
            assert_eq!(outcome.experiment_id, set.experiment_id);
            let summary = outcome.summary.as_ref().unwrap();
            assert_eq!(summary.users, set.params.num_users);
            assert_eq!(summary.reference_time, reference_time());
        }
    }

    #[test]
    fn test_parallel_batch_matches_sequential_runs() {
        let engine = SimulationEngine::new(test_catalog(25));
        let sets = ParameterSpace::grid().seeds(vec![1, 2, 3, 4]).generate();
        let outcomes = run_parallel_batch_at(&engine, &sets, Some(3), false, reference_time()).unwrap();

        for (outcome, set) in outcomes.iter().zip(&sets) {
            let sequential = run_single_simulation(&engine, set, reference_time()).unwrap();
            assert_eq!(outcome.summary, Some(DatasetSummary::from_result(&sequential)));
        }
    }

    #[test]
    fn test_invalid_set_is_reported_not_fatal() {
        let engine = SimulationEngine::new(test_catalog(5));
        let bad = ParameterSet::new(SimulationParams::new(0, 0, None), "bad".into(), 0, 1);
        let good = ParameterSet::new(SimulationParams::new(2, 0, None), "good".into(), 0, 1);
        let outcomes =
            run_parallel_batch_at(&engine, &[bad, good], Some(1), false, reference_time()).unwrap();

        assert!(!outcomes[0].is_success());
        assert!(outcomes[0].error.as_deref().unwrap().contains("num_users"));
        assert!(outcomes[1].is_success());
    }
}
