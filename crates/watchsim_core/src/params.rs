//! Simulation parameters and their validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SimulationError;

pub const DEFAULT_USER_COUNT: usize = 10;
pub const DEFAULT_MIN_MOVIES_PER_USER: usize = 0;

/// Inclusive length bounds for a randomly generated alphanumeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLength {
    pub min: usize,
    pub max: usize,
}

impl TextLength {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &'static str) -> Result<(), SimulationError> {
        if self.max < self.min {
            return Err(SimulationError::invalid_value(
                name,
                format!(
                    "maximum length {} must be greater than or equal to minimum length {}",
                    self.max, self.min
                ),
            ));
        }
        Ok(())
    }
}

pub const DEFAULT_USERNAME_LENGTH: TextLength = TextLength::new(4, 32);
pub const DEFAULT_PASSWORD_LENGTH: TextLength = TextLength::new(8, 32);
pub const DEFAULT_REVIEW_LENGTH: TextLength = TextLength::new(8, 32);

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub num_users: usize,
    pub min_movies_per_user: usize,
    /// `None` means "up to the full catalog".
    pub max_movies_per_user: Option<usize>,
    /// Random seed for reproducibility (optional; if None, seeds from entropy).
    pub seed: Option<u64>,
    pub username_length: TextLength,
    pub password_length: TextLength,
    pub review_length: TextLength,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_users: DEFAULT_USER_COUNT,
            min_movies_per_user: DEFAULT_MIN_MOVIES_PER_USER,
            max_movies_per_user: None,
            seed: None,
            username_length: DEFAULT_USERNAME_LENGTH,
            password_length: DEFAULT_PASSWORD_LENGTH,
            review_length: DEFAULT_REVIEW_LENGTH,
        }
    }
}

impl SimulationParams {
    pub fn new(num_users: usize, min_movies_per_user: usize, max_movies_per_user: Option<usize>) -> Self {
        Self {
            num_users,
            min_movies_per_user,
            max_movies_per_user,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_num_users(mut self, num_users: usize) -> Self {
        self.num_users = num_users;
        self
    }

    /// Watchlist size bounds; `max = None` leaves the cap at catalog size.
    pub fn with_movies_per_user(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_movies_per_user = min;
        self.max_movies_per_user = max;
        self
    }

    pub fn with_review_length(mut self, min: usize, max: usize) -> Self {
        self.review_length = TextLength::new(min, max);
        self
    }

    /// Range and ordering checks. Runs before any randomness is consumed.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_users == 0 {
            return Err(SimulationError::invalid_value(
                "num_users",
                "must be greater than zero",
            ));
        }

        if let Some(max) = self.max_movies_per_user {
            if max < self.min_movies_per_user {
                return Err(SimulationError::invalid_value(
                    "max_movies_per_user",
                    "must be greater than or equal to 'min_movies_per_user'",
                ));
            }
        }

        self.username_length.validate("username_length")?;
        self.password_length.validate("password_length")?;
        self.review_length.validate("review_length")?;
        Ok(())
    }

    /// Build parameters from an untyped JSON object.
    ///
    /// Missing keys take their defaults and `null` leaves `max_movies_per_user`
    /// unset. A non-integer value yields [`SimulationError::InvalidType`]; a
    /// negative integer yields [`SimulationError::InvalidValue`]. The result is
    /// validated before it is returned.
    pub fn from_json(value: &Value) -> Result<Self, SimulationError> {
        let object = value.as_object().ok_or(SimulationError::InvalidType {
            name: "params",
            expected: "object",
            found: json_type_name(value),
        })?;

        let mut params = Self::default();
        if let Some(v) = object.get("num_users") {
            let n = json_integer("num_users", v)?;
            if n <= 0 {
                return Err(SimulationError::invalid_value(
                    "num_users",
                    "must be greater than zero",
                ));
            }
            params.num_users = to_usize("num_users", n)?;
        }
        if let Some(v) = object.get("min_movies_per_user") {
            params.min_movies_per_user = non_negative("min_movies_per_user", v)?;
        }
        match object.get("max_movies_per_user") {
            None | Some(Value::Null) => {}
            Some(v) => params.max_movies_per_user = Some(non_negative("max_movies_per_user", v)?),
        }
        match object.get("seed") {
            None | Some(Value::Null) => {}
            Some(v) => {
                let seed = v.as_u64().ok_or_else(|| {
                    if v.is_i64() {
                        SimulationError::invalid_value("seed", "must be a non-negative integer")
                    } else {
                        type_error("seed", v)
                    }
                })?;
                params.seed = Some(seed);
            }
        }
        if let Some(v) = object.get("review_length") {
            params.review_length = text_length("review_length", v)?;
        }
        if let Some(v) = object.get("username_length") {
            params.username_length = text_length("username_length", v)?;
        }
        if let Some(v) = object.get("password_length") {
            params.password_length = text_length("password_length", v)?;
        }

        params.validate()?;
        Ok(params)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn type_error(name: &'static str, value: &Value) -> SimulationError {
    SimulationError::InvalidType {
        name,
        expected: "int",
        found: json_type_name(value),
    }
}

fn json_integer(name: &'static str, value: &Value) -> Result<i128, SimulationError> {
    if let Some(n) = value.as_i64() {
        return Ok(n as i128);
    }
    value
        .as_u64()
        .map(|n| n as i128)
        .ok_or_else(|| type_error(name, value))
}

fn to_usize(name: &'static str, n: i128) -> Result<usize, SimulationError> {
    usize::try_from(n).map_err(|_| SimulationError::invalid_value(name, "is out of range"))
}

fn non_negative(name: &'static str, value: &Value) -> Result<usize, SimulationError> {
    let n = json_integer(name, value)?;
    if n < 0 {
        return Err(SimulationError::invalid_value(
            name,
            "must be greater than or equal to zero",
        ));
    }
    to_usize(name, n)
}

/// Accepts `{"min": a, "max": b}` or a two-element array `[a, b]`.
fn text_length(name: &'static str, value: &Value) -> Result<TextLength, SimulationError> {
    let (min, max) = match value {
        Value::Object(map) => (
            map.get("min").ok_or_else(|| type_error(name, &Value::Null))?,
            map.get("max").ok_or_else(|| type_error(name, &Value::Null))?,
        ),
        Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
        other => {
            return Err(SimulationError::InvalidType {
                name,
                expected: "length range",
                found: json_type_name(other),
            })
        }
    };
    Ok(TextLength::new(non_negative(name, min)?, non_negative(name, max)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let params = SimulationParams::default();
        assert_eq!(params.num_users, 10);
        assert_eq!(params.min_movies_per_user, 0);
        assert_eq!(params.max_movies_per_user, None);
        assert_eq!(params.review_length, TextLength::new(8, 32));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_users_is_a_value_error() {
        let err = SimulationParams::new(0, 0, None).validate().unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn max_below_min_is_a_value_error() {
        let err = SimulationParams::new(1, 5, Some(2)).validate().unwrap_err();
        assert!(err.is_value_error());
        assert!(err.to_string().contains("max_movies_per_user"));
    }

    #[test]
    fn equal_bounds_are_valid() {
        assert!(SimulationParams::new(3, 4, Some(4)).validate().is_ok());
        assert!(SimulationParams::new(3, 0, Some(0)).validate().is_ok());
    }

    #[test]
    fn inverted_text_length_is_rejected() {
        let err = SimulationParams::default()
            .with_review_length(10, 2)
            .validate()
            .unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn from_json_reads_all_fields() {
        let params = SimulationParams::from_json(&json!({
            "num_users": 25,
            "min_movies_per_user": 2,
            "max_movies_per_user": 8,
            "seed": 99,
            "review_length": [10, 20],
        }))
        .unwrap();
        assert_eq!(params.num_users, 25);
        assert_eq!(params.min_movies_per_user, 2);
        assert_eq!(params.max_movies_per_user, Some(8));
        assert_eq!(params.seed, Some(99));
        assert_eq!(params.review_length, TextLength::new(10, 20));
    }

    #[test]
    fn from_json_null_max_means_unset() {
        let params = SimulationParams::from_json(&json!({ "max_movies_per_user": null })).unwrap();
        assert_eq!(params, SimulationParams::default());
    }

    #[test]
    fn from_json_string_min_is_a_type_error() {
        let err = SimulationParams::from_json(&json!({ "min_movies_per_user": "a" })).unwrap_err();
        assert!(err.is_type_error());
        assert_eq!(
            err.to_string(),
            "'min_movies_per_user' must be of type 'int' but was 'str'"
        );
    }

    #[test]
    fn from_json_float_user_count_is_a_type_error() {
        let err = SimulationParams::from_json(&json!({ "num_users": 2.5 })).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn from_json_rejects_non_positive_and_negative_values() {
        for value in [
            json!({ "num_users": 0 }),
            json!({ "num_users": -3 }),
            json!({ "min_movies_per_user": -1 }),
            json!({ "max_movies_per_user": -1 }),
            json!({ "min_movies_per_user": 5, "max_movies_per_user": 2 }),
        ] {
            let err = SimulationParams::from_json(&value).unwrap_err();
            assert!(err.is_value_error(), "{value} should be a value error, got {err}");
        }
    }

    #[test]
    fn from_json_requires_an_object() {
        let err = SimulationParams::from_json(&json!([1, 2, 3])).unwrap_err();
        assert!(err.is_type_error());
    }
}
