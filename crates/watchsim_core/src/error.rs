use chrono::{DateTime, Utc};

use crate::catalog::MovieId;

/// Errors returned by [`crate::engine::SimulationEngine`] before any generation work starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A configuration value arrived with the wrong dynamic type.
    #[error("'{name}' must be of type '{expected}' but was '{found}'")]
    InvalidType {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A value has the right type but violates a range or ordering constraint.
    #[error("'{name}' {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("movie {movie_id} is released at {released}, not before the reference time {now}")]
    UnreleasedMovie {
        movie_id: MovieId,
        released: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}

impl SimulationError {
    pub(crate) fn invalid_value(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            reason: reason.into(),
        }
    }

    /// True for the type-mismatch kind.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::InvalidType { .. })
    }

    /// True for the range/ordering kind.
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}
