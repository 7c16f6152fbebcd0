//! Parameter variation framework for batches of watch simulations.
//!
//! This module provides tools for defining parameter spaces and generating
//! parameter sets for parallel runs. Supports grid search and random sampling.

use watchsim_core::SimulationParams;

mod constraints;
mod sampling;

use constraints::is_valid_movie_bounds;

/// A single parameter configuration with run metadata.
///
/// Each set carries the parameters, an experiment identifier, a run index and
/// the seed for that run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ParameterSet {
    /// Base simulation parameters.
    pub params: SimulationParams,
    /// Unique experiment ID for this parameter configuration.
    pub experiment_id: String,
    /// Run ID within the experiment (for multiple runs with same params).
    pub run_id: usize,
    /// Seed used for this run.
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(params: SimulationParams, experiment_id: String, run_id: usize, seed: u64) -> Self {
        Self {
            params,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// Get the simulation params with seed applied.
    pub fn simulation_params(&self) -> SimulationParams {
        self.params.clone().with_seed(self.seed)
    }
}

/// Defines a parameter space for exploration.
///
/// Dimensions left empty fall back to the base parameters.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base: SimulationParams,
    num_users: Vec<usize>,
    min_movies: Vec<usize>,
    max_movies: Vec<Option<usize>>,
    /// Explicit seeds; every combination runs once per seed.
    seeds: Vec<u64>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            base: SimulationParams::default(),
            num_users: vec![],
            min_movies: vec![],
            max_movies: vec![],
            seeds: vec![],
        }
    }

    /// Create a new parameter space for grid search.
    pub fn grid() -> Self {
        Self::new()
    }

    pub fn num_users(mut self, counts: Vec<usize>) -> Self {
        self.num_users = counts;
        self
    }

    pub fn min_movies(mut self, mins: Vec<usize>) -> Self {
        self.min_movies = mins;
        self
    }

    /// `None` entries mean "no explicit cap".
    pub fn max_movies(mut self, maxes: Vec<Option<usize>>) -> Self {
        self.max_movies = maxes;
        self
    }

    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Use `base` for every dimension not varied explicitly.
    pub fn with_base(mut self, base: SimulationParams) -> Self {
        self.base = base;
        self
    }

    fn num_users_values(&self) -> Vec<usize> {
        or_base(&self.num_users, self.base.num_users)
    }

    fn min_movies_values(&self) -> Vec<usize> {
        or_base(&self.min_movies, self.base.min_movies_per_user)
    }

    fn max_movies_values(&self) -> Vec<Option<usize>> {
        or_base(&self.max_movies, self.base.max_movies_per_user)
    }

    /// Generate all parameter sets using grid search (Cartesian product).
    ///
    /// Combinations with `max < min` are skipped. Without explicit seeds each
    /// combination runs once with a seed derived from its experiment index.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let maxes = self.max_movies_values();
        let mins = self.min_movies_values();

        let combinations = self.num_users_values().into_iter().flat_map(move |num_users| {
            let maxes = maxes.clone();
            mins.clone().into_iter().flat_map(move |min| {
                maxes
                    .clone()
                    .into_iter()
                    .map(move |max| (num_users, min, max))
            })
        });

        combinations
            .filter(|&(_, min, max)| is_valid_movie_bounds(min, max))
            .enumerate()
            .flat_map(|(experiment_id, (num_users, min, max))| {
                let params = self
                    .base
                    .clone()
                    .with_num_users(num_users)
                    .with_movies_per_user(min, max);
                let seeds = if self.seeds.is_empty() {
                    vec![(experiment_id as u64).wrapping_mul(0x9e3779b9)]
                } else {
                    self.seeds.clone()
                };
                seeds.into_iter().enumerate().map(move |(run_id, seed)| {
                    ParameterSet::new(params.clone(), format!("exp_{experiment_id}"), run_id, seed)
                })
            })
            .collect()
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}

fn or_base<T: Clone>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}
