//! Movie catalog: the fixed, read-only input of every simulation run.
//!
//! A catalog can be built from an in-memory list of [`Movie`]s or loaded from
//! the movie CSV the review application seeds its repository from
//! (`Rank,Title,Genre,Description,Director,Actors,Year,Runtime (Minutes),...`).

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stable movie identity (the `Rank` column of the catalog CSV).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u32);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub release_year: i32,
    pub genres: Vec<String>,
    pub description: String,
    pub director: Option<String>,
    pub actors: Vec<String>,
    pub runtime_minutes: Option<u32>,
}

impl Movie {
    /// Minimal movie with only the fields the simulation reads.
    pub fn new(id: u32, title: impl Into<String>, release_year: i32) -> Self {
        Self {
            id: MovieId(id),
            title: title.into(),
            release_year,
            genres: Vec::new(),
            description: String::new(),
            director: None,
            actors: Vec::new(),
            runtime_minutes: None,
        }
    }

    /// Midnight UTC on Jan 1 of the release year, or `None` if the year is out of chrono's range.
    pub fn release_instant(&self) -> Option<DateTime<Utc>> {
        release_instant(self.release_year)
    }
}

pub fn release_instant(year: i32) -> Option<DateTime<Utc>> {
    Some(NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc())
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("duplicate movie id {0}")]
    DuplicateMovie(MovieId),

    #[error("movie {id} has unrepresentable release year {year}")]
    InvalidReleaseYear { id: MovieId, year: i32 },
}

/// Ordered, immutable collection of movies.
///
/// Release instants are resolved once at construction so the engine never has
/// to deal with an unrepresentable year mid-run.
#[derive(Debug, Clone, Default)]
pub struct MovieCatalog {
    movies: Vec<Movie>,
    release_instants: Vec<DateTime<Utc>>,
}

impl MovieCatalog {
    pub fn new(movies: Vec<Movie>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(movies.len());
        let mut release_instants = Vec::with_capacity(movies.len());
        for movie in &movies {
            if !seen.insert(movie.id) {
                return Err(CatalogError::DuplicateMovie(movie.id));
            }
            let released = movie
                .release_instant()
                .ok_or(CatalogError::InvalidReleaseYear {
                    id: movie.id,
                    year: movie.release_year,
                })?;
            release_instants.push(released);
        }

        Ok(Self {
            movies,
            release_instants,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the application's movie CSV format.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut movies = Vec::new();
        for record in csv_reader.deserialize::<CatalogRecord>() {
            movies.push(record?.into_movie());
        }
        tracing::debug!(movies = movies.len(), "parsed movie catalog");
        Self::new(movies)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn find(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    pub(crate) fn release_instant_at(&self, index: usize) -> DateTime<Utc> {
        self.release_instants[index]
    }

    /// Latest release instant in the catalog, if any.
    pub fn latest_release(&self) -> Option<(MovieId, DateTime<Utc>)> {
        self.movies
            .iter()
            .zip(&self.release_instants)
            .max_by_key(|(_, released)| **released)
            .map(|(movie, released)| (movie.id, *released))
    }
}

/// One row of the catalog CSV. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(rename = "Rank")]
    rank: u32,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Runtime (Minutes)", default)]
    runtime_minutes: Option<u32>,
}

impl CatalogRecord {
    fn into_movie(self) -> Movie {
        let director = Some(self.director).filter(|d| !d.is_empty());
        Movie {
            id: MovieId(self.rank),
            title: self.title,
            release_year: self.year,
            genres: split_list(&self.genre),
            description: self.description,
            director,
            actors: split_list(&self.actors),
            runtime_minutes: self.runtime_minutes,
        }
    }
}

fn split_list(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
