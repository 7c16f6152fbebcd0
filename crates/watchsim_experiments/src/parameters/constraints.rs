/// Whether `min..=max` is a usable watchlist size range (`None` max is always usable).
pub(super) fn is_valid_movie_bounds(min: usize, max: Option<usize>) -> bool {
    max.map_or(true, |max| max >= min)
}
