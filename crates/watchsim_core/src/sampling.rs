//! Random draws used by the engine.
//!
//! Every function takes the RNG explicitly so a run can be replayed from a seed.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::model::{MAX_RATING, MIN_RATING};
use crate::params::TextLength;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Random `[a-zA-Z0-9]` string with a length uniform in `length.min..=length.max`.
pub fn random_text<R: Rng + ?Sized>(rng: &mut R, length: TextLength) -> String {
    let len = rng.gen_range(length.min..=length.max);
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

pub fn random_rating<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(MIN_RATING..=MAX_RATING)
}

/// Uniform count in `0..=upper`.
pub fn prefix_len<R: Rng + ?Sized>(rng: &mut R, upper: usize) -> usize {
    rng.gen_range(0..=upper)
}

/// Review timestamp in `(released, now]`.
///
/// Draws a whole-second offset uniformly in `[0, span]` before `now`, where
/// `span` is the whole-second distance from `released` to `now`, then adds
/// sub-second jitter. The total offset is capped one nanosecond short of the
/// exact distance so the result never lands on or before `released`.
///
/// `released` must be strictly before `now`.
pub fn review_timestamp<R: Rng + ?Sized>(
    rng: &mut R,
    released: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    debug_assert!(released < now, "release must precede the reference time");
    let exact = now - released;
    let span_secs = exact.num_seconds();
    let offset_secs = rng.gen_range(0..=span_secs);
    let jitter_nanos = rng.gen_range(0..NANOS_PER_SEC);

    let offset = Duration::seconds(offset_secs) + Duration::nanoseconds(jitter_nanos);
    let limit = exact - Duration::nanoseconds(1);
    now - offset.min(limit)
}
