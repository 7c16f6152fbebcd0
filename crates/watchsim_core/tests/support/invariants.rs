use std::collections::HashSet;

use watchsim_core::{MovieCatalog, SimulationResult};

/// Assert every structural and temporal property a generated dataset must satisfy.
pub fn assert_dataset_invariants(result: &SimulationResult, catalog: &MovieCatalog) {
    let now = result.reference_time();

    for user in result.users() {
        let watchlist: HashSet<_> = user.watchlist().iter().copied().collect();
        assert_eq!(watchlist.len(), user.watchlist_size(), "watchlist has duplicates");
        assert!(user.watched().len() <= user.watchlist_size());
        assert!(user.reviews().len() <= user.watched().len());

        for movie in user.watchlist() {
            assert!(catalog.find(*movie).is_some(), "watchlist movie {movie} not in catalog");
        }

        for (i, review) in user.reviews().iter().enumerate() {
            assert_eq!(review.author, user.id());
            assert_eq!(review.movie, user.watched()[i], "reviews follow watched order");
            assert!(user.has_watched(review.movie));
            assert!(review.rating <= 10);
            assert!((8..=32).contains(&review.text.len()));

            let released = catalog
                .find(review.movie)
                .and_then(|movie| movie.release_instant())
                .expect("reviewed movie should be in the catalog");
            assert!(review.timestamp > released, "review predates release");
            assert!(review.timestamp <= now, "review is after the reference time");
        }
    }

    let from_users: Vec<_> = result
        .users()
        .iter()
        .flat_map(|user| user.reviews().iter().cloned())
        .collect();
    assert_eq!(result.reviews().len(), from_users.len());
    let flat: HashSet<_> = result.reviews().iter().map(|r| (r.author, r.movie)).collect();
    let owned: HashSet<_> = from_users.iter().map(|r| (r.author, r.movie)).collect();
    assert_eq!(flat, owned);
    assert_eq!(flat.len(), result.reviews().len(), "flat review list has duplicates");
}
