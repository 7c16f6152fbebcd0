mod support;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use support::invariants::assert_dataset_invariants;
use watchsim_core::test_helpers::{reference_time, single_movie_catalog, test_catalog};
use watchsim_core::{MovieCatalog, SimulationEngine, SimulationError, SimulationParams};

#[test]
fn returns_exactly_num_users() {
    let engine = SimulationEngine::new(test_catalog(50));
    for num_users in [1, 2, 10, 37] {
        let result = engine
            .simulate_at(&SimulationParams::new(num_users, 0, None).with_seed(7), reference_time())
            .unwrap();
        assert_eq!(result.users().len(), num_users);
    }
}

#[test]
fn invariants_hold_across_seeds() {
    let catalog = test_catalog(40);
    let engine = SimulationEngine::new(catalog.clone());
    for seed in 0..25 {
        let params = SimulationParams::new(15, 0, None).with_seed(seed);
        let result = engine.simulate_at(&params, reference_time()).unwrap();
        assert_eq!(result.users().len(), 15);
        assert_dataset_invariants(&result, &catalog);
    }
}

#[test]
fn watchlist_sizes_stay_within_bounds() {
    let engine = SimulationEngine::new(test_catalog(30));
    let params = SimulationParams::new(200, 3, Some(7)).with_seed(5);
    let result = engine.simulate_at(&params, reference_time()).unwrap();
    for user in result.users() {
        assert!((3..=7).contains(&user.watchlist_size()));
    }
}

#[test]
fn equal_min_and_max_fix_watchlist_size() {
    let engine = SimulationEngine::new(test_catalog(30));
    let params = SimulationParams::new(50, 6, Some(6)).with_seed(9);
    let result = engine.simulate_at(&params, reference_time()).unwrap();
    assert!(result.users().iter().all(|user| user.watchlist_size() == 6));
}

#[test]
fn max_above_catalog_is_capped_at_catalog_size() {
    let catalog = test_catalog(5);
    let engine = SimulationEngine::new(catalog.clone());
    let params = SimulationParams::new(100, 5, Some(50)).with_seed(3);
    let result = engine.simulate_at(&params, reference_time()).unwrap();
    assert!(result.users().iter().all(|user| user.watchlist_size() == 5));
    assert_dataset_invariants(&result, &catalog);
}

#[test]
fn min_above_catalog_is_clamped_not_rejected() {
    let engine = SimulationEngine::new(test_catalog(3));
    let params = SimulationParams::new(10, 8, None).with_seed(3);
    let result = engine.simulate_at(&params, reference_time()).unwrap();
    assert!(result.users().iter().all(|user| user.watchlist_size() == 3));
}

#[test]
fn empty_catalog_yields_empty_user() {
    let engine = SimulationEngine::new(MovieCatalog::empty());
    let result = engine
        .simulate_at(&SimulationParams::new(1, 0, None), reference_time())
        .unwrap();
    assert_eq!(result.users().len(), 1);
    let user = &result.users()[0];
    assert_eq!(user.watchlist_size(), 0);
    assert!(user.watched().is_empty());
    assert!(user.reviews().is_empty());
    assert!(result.reviews().is_empty());
}

#[test]
fn zero_users_is_a_value_error() {
    let engine = SimulationEngine::new(test_catalog(5));
    let err = engine
        .simulate_at(&SimulationParams::new(0, 0, None), reference_time())
        .unwrap_err();
    assert!(err.is_value_error());
}

#[test]
fn max_below_min_is_a_value_error() {
    let engine = SimulationEngine::new(test_catalog(5));
    let err = engine
        .simulate_at(&SimulationParams::new(3, 5, Some(2)), reference_time())
        .unwrap_err();
    assert!(err.is_value_error());
}

#[test]
fn non_integer_min_from_json_is_a_type_error() {
    let err = SimulationParams::from_json(&json!({ "num_users": 3, "min_movies_per_user": "a" }))
        .unwrap_err();
    assert!(matches!(err, SimulationError::InvalidType { name: "min_movies_per_user", .. }));
}

#[test]
fn reviews_of_last_year_movie_stay_in_window() {
    let catalog = single_movie_catalog(2024);
    let engine = SimulationEngine::new(catalog.clone());
    let params = SimulationParams::new(300, 1, Some(1)).with_seed(21);
    let result = engine.simulate_at(&params, reference_time()).unwrap();
    assert_dataset_invariants(&result, &catalog);
}

#[test]
fn injected_rng_is_the_only_source_of_randomness() {
    let engine = SimulationEngine::new(test_catalog(25));
    let params = SimulationParams::new(12, 0, None);

    let first = engine
        .simulate_with_rng(&params, reference_time(), &mut StdRng::seed_from_u64(100))
        .unwrap();
    let second = engine
        .simulate_with_rng(&params, reference_time(), &mut StdRng::seed_from_u64(100))
        .unwrap();
    assert_eq!(first.users(), second.users());
}

#[test]
fn engine_clones_can_run_on_separate_threads() {
    let catalog = test_catalog(20);
    let engine = SimulationEngine::new(catalog.clone());
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                engine
                    .simulate_at(&SimulationParams::new(10, 0, None).with_seed(seed), reference_time())
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result.users().len(), 10);
        assert_dataset_invariants(&result, &catalog);
    }
}

#[test]
fn sample_catalog_file_loads_and_simulates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/movies_sample.csv");
    let catalog = MovieCatalog::from_csv_path(path).unwrap();
    assert_eq!(catalog.len(), 8);

    let engine = SimulationEngine::new(catalog.clone());
    let result = engine
        .simulate_at(&SimulationParams::default().with_seed(2024), reference_time())
        .unwrap();
    assert_eq!(result.users().len(), 10);
    assert_dataset_invariants(&result, &catalog);
}
