//! Generate a small dataset from a built-in catalog and print it.
//!
//! Run with: cargo run -p watchsim_core --example seed_dataset

use watchsim_core::{Movie, MovieCatalog, SimulationEngine, SimulationParams};

fn main() {
    let catalog = MovieCatalog::new(vec![
        Movie::new(1, "Guardians of the Galaxy", 2014),
        Movie::new(2, "Prometheus", 2012),
        Movie::new(3, "Split", 2016),
        Movie::new(4, "Sing", 2016),
        Movie::new(5, "Suicide Squad", 2016),
    ])
    .expect("built-in catalog is valid");

    let engine = SimulationEngine::new(catalog);
    let result = engine
        .simulate(&SimulationParams::new(5, 1, Some(4)).with_seed(123))
        .expect("parameters are valid");

    println!("--- Watch simulation (5 users, 1-4 movies each, seed 123) ---");
    for user in result.users() {
        println!(
            "{} ({}): watchlist={} watched={} reviews={}",
            user.id(),
            user.username(),
            user.watchlist_size(),
            user.watched().len(),
            user.reviews().len()
        );
        for review in user.reviews() {
            println!(
                "    movie={} rating={} at {}  \"{}\"",
                review.movie, review.rating, review.timestamp, review.text
            );
        }
    }
    println!("Total reviews: {}", result.reviews().len());
}
