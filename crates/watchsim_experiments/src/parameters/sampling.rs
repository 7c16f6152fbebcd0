use super::constraints::is_valid_movie_bounds;
use super::{ParameterSet, ParameterSpace};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashSet;

impl ParameterSpace {
    /// Generate random parameter sets (Monte Carlo sampling).
    ///
    /// Samples `count` parameter sets from the defined space. Each sampled set
    /// gets its own derived seed, so duplicates of the parameter values are
    /// allowed only as distinct runs; identical (params, seed) pairs are not.
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut parameter_sets = Vec::new();
        let mut seen = HashSet::new();
        let mut attempts = 0;
        const MAX_ATTEMPTS: usize = 10000;

        let num_users = self.num_users_values();
        let mins = self.min_movies_values();
        let maxes = self.max_movies_values();

        while parameter_sets.len() < count && attempts < MAX_ATTEMPTS {
            attempts += 1;

            let users = num_users[rng.gen_range(0..num_users.len())];
            let min = mins[rng.gen_range(0..mins.len())];
            let max = maxes[rng.gen_range(0..maxes.len())];
            if !is_valid_movie_bounds(min, max) {
                continue;
            }

            let run_seed = if self.seeds.is_empty() {
                rng.gen()
            } else {
                self.seeds[rng.gen_range(0..self.seeds.len())]
            };
            if !seen.insert((users, min, max, run_seed)) {
                continue;
            }

            let params = self
                .base
                .clone()
                .with_num_users(users)
                .with_movies_per_user(min, max);
            parameter_sets.push(ParameterSet::new(
                params,
                format!("random_{}", parameter_sets.len()),
                0,
                run_seed,
            ));
        }

        if parameter_sets.len() < count {
            tracing::warn!(
                requested = count,
                generated = parameter_sets.len(),
                "parameter space exhausted before reaching requested sample count"
            );
        }
        parameter_sets
    }
}
