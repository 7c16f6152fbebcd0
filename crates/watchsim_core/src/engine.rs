//! Simulation engine: generates users, watchlists, watch history and reviews
//! from a fixed movie catalog.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::catalog::MovieCatalog;
use crate::error::SimulationError;
use crate::model::{Review, SimulatedUser, SimulationResult, UserId};
use crate::params::SimulationParams;
use crate::sampling::{prefix_len, random_rating, random_text, review_timestamp};

/// Stateless generator over a shared, read-only catalog.
///
/// Cloning is cheap and clones share the catalog, so separate threads can run
/// independent simulations, each with its own RNG.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    catalog: Arc<MovieCatalog>,
}

/// Effective watchlist size bounds after clamping against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistBounds {
    pub min: usize,
    pub max: usize,
}

impl SimulationEngine {
    pub fn new(catalog: MovieCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn from_shared(catalog: Arc<MovieCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }

    /// Run with the current wall-clock time as "now".
    ///
    /// Seeds the RNG from `params.seed`, or from entropy when unset.
    pub fn simulate(&self, params: &SimulationParams) -> Result<SimulationResult, SimulationError> {
        self.simulate_at(params, Utc::now())
    }

    /// Run against an explicit reference time.
    pub fn simulate_at(
        &self,
        params: &SimulationParams,
        now: DateTime<Utc>,
    ) -> Result<SimulationResult, SimulationError> {
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.simulate_with_rng(params, now, &mut rng)
    }

    /// Run with a caller-supplied RNG. `params.seed` is ignored.
    ///
    /// Validation happens before the RNG is touched; on error nothing is
    /// generated.
    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        params: &SimulationParams,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SimulationResult, SimulationError> {
        params.validate()?;
        self.check_catalog_released(now)?;

        let bounds = self.watchlist_bounds(params);
        if bounds.min < params.min_movies_per_user {
            tracing::warn!(
                requested_min = params.min_movies_per_user,
                clamped_min = bounds.min,
                catalog_size = self.catalog.len(),
                "min_movies_per_user exceeds the catalog; clamping"
            );
        }

        tracing::info!(
            num_users = params.num_users,
            min_movies = bounds.min,
            max_movies = bounds.max,
            catalog_size = self.catalog.len(),
            %now,
            "starting watch simulation"
        );

        let users: Vec<SimulatedUser> = (0..params.num_users)
            .map(|i| self.simulate_user(UserId(i as u32), params, bounds, now, rng))
            .collect();
        let result = SimulationResult::new(users, now);

        tracing::info!(
            users = result.users().len(),
            reviews = result.reviews().len(),
            "watch simulation finished"
        );
        Ok(result)
    }

    /// Watchlist size range for `params` against this catalog.
    ///
    /// The upper bound is `min(max or catalog_size, catalog_size)`; a minimum
    /// above it is clamped down to it.
    pub fn watchlist_bounds(&self, params: &SimulationParams) -> WatchlistBounds {
        let catalog_size = self.catalog.len();
        let max = params
            .max_movies_per_user
            .unwrap_or(catalog_size)
            .min(catalog_size);
        WatchlistBounds {
            min: params.min_movies_per_user.min(max),
            max,
        }
    }

    fn check_catalog_released(&self, now: DateTime<Utc>) -> Result<(), SimulationError> {
        match self.catalog.latest_release() {
            Some((movie_id, released)) if released >= now => Err(SimulationError::UnreleasedMovie {
                movie_id,
                released,
                now,
            }),
            _ => Ok(()),
        }
    }

    fn simulate_user<R: Rng + ?Sized>(
        &self,
        id: UserId,
        params: &SimulationParams,
        bounds: WatchlistBounds,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SimulatedUser {
        let username = random_text(rng, params.username_length);
        let password = random_text(rng, params.password_length);
        let mut user = SimulatedUser::new(id, username, password);

        // Distinct catalog indices in random order; watched and reviewed are prefixes of it.
        let size = rng.gen_range(bounds.min..=bounds.max);
        let picks = index::sample(rng, self.catalog.len(), size).into_vec();
        for &idx in &picks {
            user.add_to_watchlist(self.catalog.movies()[idx].id);
        }

        let watched = prefix_len(rng, picks.len());
        user.watch_first(watched);

        let reviewed = prefix_len(rng, watched);
        for &idx in &picks[..reviewed] {
            let movie = &self.catalog.movies()[idx];
            let text = random_text(rng, params.review_length);
            let rating = random_rating(rng);
            let timestamp = review_timestamp(rng, self.catalog.release_instant_at(idx), now);
            user.add_review(Review {
                author: id,
                movie: movie.id,
                text,
                rating,
                timestamp,
            });
        }

        tracing::debug!(
            user = %id,
            watchlist = user.watchlist_size(),
            watched,
            reviewed,
            "simulated user"
        );
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Movie;
    use chrono::TimeZone;

    fn catalog(n: u32) -> MovieCatalog {
        MovieCatalog::new(
            (1..=n)
                .map(|i| Movie::new(i, format!("Movie {i}"), 1990 + (i as i32 % 30)))
                .collect(),
        )
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn bounds_default_to_catalog_size() {
        let engine = SimulationEngine::new(catalog(12));
        let bounds = engine.watchlist_bounds(&SimulationParams::default());
        assert_eq!(bounds, WatchlistBounds { min: 0, max: 12 });
    }

    #[test]
    fn bounds_clamp_max_and_min_to_catalog() {
        let engine = SimulationEngine::new(catalog(4));
        let bounds = engine.watchlist_bounds(&SimulationParams::new(1, 6, Some(9)));
        assert_eq!(bounds, WatchlistBounds { min: 4, max: 4 });

        let bounds = engine.watchlist_bounds(&SimulationParams::new(1, 6, None));
        assert_eq!(bounds, WatchlistBounds { min: 4, max: 4 });
    }

    #[test]
    fn validation_failure_consumes_no_randomness() {
        let engine = SimulationEngine::new(catalog(5));
        let mut rng = StdRng::seed_from_u64(11);
        let mut untouched = StdRng::seed_from_u64(11);

        let err = engine
            .simulate_with_rng(&SimulationParams::new(0, 0, None), now(), &mut rng)
            .unwrap_err();
        assert!(err.is_value_error());
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn same_seed_and_time_reproduce_the_dataset() {
        let engine = SimulationEngine::new(catalog(20));
        let params = SimulationParams::new(8, 2, Some(10)).with_seed(42);
        let first = engine.simulate_at(&params, now()).unwrap();
        let second = engine.simulate_at(&params, now()).unwrap();
        assert_eq!(first.users(), second.users());
        assert_eq!(first.reviews(), second.reviews());
    }

    #[test]
    fn unreleased_movie_is_rejected_up_front() {
        let movies = vec![Movie::new(1, "Old", 1999), Movie::new(2, "Future", 2030)];
        let engine = SimulationEngine::new(MovieCatalog::new(movies).unwrap());
        let err = engine
            .simulate_at(&SimulationParams::default().with_seed(1), now())
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::UnreleasedMovie { movie_id, .. } if movie_id.0 == 2
        ));
    }
}
