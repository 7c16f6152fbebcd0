//! Generated entities: users, reviews, and the result bundle of a run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::MovieId;

/// Sequential user identity, unique within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

pub const MIN_RATING: u8 = 0;
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub author: UserId,
    pub movie: MovieId,
    pub text: String,
    /// In `MIN_RATING..=MAX_RATING`.
    pub rating: u8,
    pub timestamp: DateTime<Utc>,
}

/// A synthetic user.
///
/// The watched set is a prefix of the watchlist and reviews cover a prefix of
/// the watched set, so `reviews ⊆ watched ⊆ watchlist` holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedUser {
    id: UserId,
    username: String,
    password: String,
    watchlist: Vec<MovieId>,
    watched_count: usize,
    reviews: Vec<Review>,
}

impl SimulatedUser {
    pub(crate) fn new(id: UserId, username: String, password: String) -> Self {
        Self {
            id,
            username,
            password,
            watchlist: Vec::new(),
            watched_count: 0,
            reviews: Vec::new(),
        }
    }

    pub(crate) fn add_to_watchlist(&mut self, movie: MovieId) {
        debug_assert!(!self.watchlist.contains(&movie), "watchlist entries are distinct");
        self.watchlist.push(movie);
    }

    pub(crate) fn watch_first(&mut self, count: usize) {
        debug_assert!(count <= self.watchlist.len());
        self.watched_count = count.min(self.watchlist.len());
    }

    pub(crate) fn add_review(&mut self, review: Review) {
        debug_assert!(self.watched().contains(&review.movie));
        self.reviews.push(review);
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Watchlist in sampling order.
    pub fn watchlist(&self) -> &[MovieId] {
        &self.watchlist
    }

    pub fn watchlist_size(&self) -> usize {
        self.watchlist.len()
    }

    pub fn watched(&self) -> &[MovieId] {
        &self.watchlist[..self.watched_count]
    }

    pub fn has_watched(&self, movie: MovieId) -> bool {
        self.watched().contains(&movie)
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }
}

// Serialized with an explicit watched list; `watched_count` stays internal.
#[derive(Serialize)]
struct UserView<'a> {
    id: UserId,
    username: &'a str,
    password: &'a str,
    watchlist: &'a [MovieId],
    watched: &'a [MovieId],
    reviews: &'a [Review],
}

impl Serialize for SimulatedUser {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        UserView {
            id: self.id,
            username: &self.username,
            password: &self.password,
            watchlist: &self.watchlist,
            watched: self.watched(),
            reviews: &self.reviews,
        }
        .serialize(serializer)
    }
}

/// Immutable output of one run.
///
/// `reviews` is a flat copy of every user's reviews, in user order, for bulk
/// consumers.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    users: Vec<SimulatedUser>,
    reviews: Vec<Review>,
    reference_time: DateTime<Utc>,
}

impl SimulationResult {
    pub(crate) fn new(users: Vec<SimulatedUser>, reference_time: DateTime<Utc>) -> Self {
        let reviews = users
            .iter()
            .flat_map(|user| user.reviews.iter().cloned())
            .collect();
        Self {
            users,
            reviews,
            reference_time,
        }
    }

    pub fn users(&self) -> &[SimulatedUser] {
        &self.users
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// The "now" shared by every review of the run.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    pub fn user(&self, id: UserId) -> Option<&SimulatedUser> {
        self.users.get(id.0 as usize).filter(|user| user.id == id)
    }

    pub fn into_parts(self) -> (Vec<SimulatedUser>, Vec<Review>) {
        (self.users, self.reviews)
    }
}

impl Serialize for SimulationResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SimulationResult", 3)?;
        state.serialize_field("reference_time", &self.reference_time)?;
        state.serialize_field("users", &self.users)?;
        state.serialize_field("reviews", &self.reviews)?;
        state.end()
    }
}
