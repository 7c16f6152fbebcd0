use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use watchsim_core::{MovieCatalog, SimulationEngine, SimulationParams};
use watchsim_experiments::{
    export_dataset_to_json, export_reviews_to_csv, export_summaries_to_csv,
    export_summaries_to_json, run_parallel_batch, DatasetSummary, ParameterSpace,
};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "watchsim",
    about = "Generate synthetic users, watchlists and reviews from a movie catalog",
    long_about = "Seeds the movie-review application with a randomized but consistent\n\
                  population of users, watch history and timestamped reviews."
)]
struct Cli {
    /// Movie catalog CSV (Rank,Title,Genre,...,Year,...)
    #[arg(long, global = true, env = "WATCHSIM_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and optionally export the dataset
    Generate {
        /// Number of users to generate
        #[arg(long, env = "WATCHSIM_NUM_USERS", default_value_t = watchsim_core::params::DEFAULT_USER_COUNT)]
        num_users: usize,
        /// Minimum watchlist size per user
        #[arg(long, env = "WATCHSIM_MIN_MOVIES", default_value_t = watchsim_core::params::DEFAULT_MIN_MOVIES_PER_USER)]
        min_movies: usize,
        /// Maximum watchlist size per user (defaults to catalog size)
        #[arg(long, env = "WATCHSIM_MAX_MOVIES")]
        max_movies: Option<usize>,
        /// RNG seed; random when omitted
        #[arg(long, env = "WATCHSIM_SEED")]
        seed: Option<u64>,
        /// JSON parameter file; overrides the individual flags
        #[arg(long)]
        params: Option<PathBuf>,
        /// Write the full dataset as JSON
        #[arg(long)]
        out_json: Option<PathBuf>,
        /// Write one CSV row per review
        #[arg(long)]
        out_reviews_csv: Option<PathBuf>,
    },
    /// Run a grid of simulations in parallel and export summaries
    Sweep {
        /// User counts to explore
        #[arg(long, value_delimiter = ',', default_values_t = vec![watchsim_core::params::DEFAULT_USER_COUNT])]
        num_users: Vec<usize>,
        /// Minimum watchlist sizes to explore
        #[arg(long, value_delimiter = ',')]
        min_movies: Vec<usize>,
        /// Maximum watchlist sizes to explore
        #[arg(long, value_delimiter = ',')]
        max_movies: Vec<usize>,
        /// Seeds; each combination runs once per seed
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<u64>,
        /// Worker threads (rayon default when omitted)
        #[arg(long, env = "WATCHSIM_THREADS")]
        threads: Option<usize>,
        /// Output file; `.json` writes JSON, anything else CSV
        #[arg(long, default_value = "sweep_summaries.csv")]
        out: PathBuf,
        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_engine(catalog: Option<&Path>) -> Result<SimulationEngine> {
    let Some(path) = catalog else {
        bail!("no catalog given; pass --catalog or set WATCHSIM_CATALOG");
    };
    let catalog = MovieCatalog::from_csv_path(path)
        .with_context(|| format!("loading catalog {}", path.display()))?;
    tracing::info!(movies = catalog.len(), path = %path.display(), "loaded catalog");
    Ok(SimulationEngine::new(catalog))
}

fn load_params_file(path: &Path) -> Result<SimulationParams> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(SimulationParams::from_json(&value)?)
}

fn print_summary(summary: &DatasetSummary) {
    println!("Users:            {}", summary.users);
    println!("Mean watchlist:   {:.2}", summary.mean_watchlist_size);
    println!("Watched movies:   {}", summary.total_watched);
    println!("Reviews:          {}", summary.total_reviews);
    println!("Mean rating:      {:.2}", summary.mean_rating);
    if let (Some(earliest), Some(latest)) = (summary.earliest_review, summary.latest_review) {
        println!("Review window:    {earliest} .. {latest}");
    }
}

/// Export errors are boxed `dyn Error` without `Send + Sync`; keep the message.
fn export_error(error: Box<dyn std::error::Error>) -> anyhow::Error {
    anyhow::anyhow!(error.to_string())
}

// ── commands ───────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn generate(
    engine: &SimulationEngine,
    num_users: usize,
    min_movies: usize,
    max_movies: Option<usize>,
    seed: Option<u64>,
    params_file: Option<&Path>,
    out_json: Option<&Path>,
    out_reviews_csv: Option<&Path>,
) -> Result<()> {
    let params = match params_file {
        Some(path) => load_params_file(path)?,
        None => {
            let mut params = SimulationParams::new(num_users, min_movies, max_movies);
            params.seed = seed;
            params
        }
    };

    let result = engine.simulate(&params)?;
    print_summary(&DatasetSummary::from_result(&result));

    if let Some(path) = out_json {
        export_dataset_to_json(&result, path).map_err(export_error)?;
        tracing::info!(path = %path.display(), "wrote dataset JSON");
    }
    if let Some(path) = out_reviews_csv {
        export_reviews_to_csv(&result, engine.catalog(), path).map_err(export_error)?;
        tracing::info!(path = %path.display(), "wrote review CSV");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn sweep(
    engine: &SimulationEngine,
    num_users: Vec<usize>,
    min_movies: Vec<usize>,
    max_movies: Vec<usize>,
    seeds: Vec<u64>,
    threads: Option<usize>,
    out: &Path,
    quiet: bool,
) -> Result<()> {
    let sets = ParameterSpace::grid()
        .num_users(num_users)
        .min_movies(min_movies)
        .max_movies(max_movies.into_iter().map(Some).collect())
        .seeds(seeds)
        .generate();
    if sets.is_empty() {
        bail!("parameter grid is empty (every max is below every min)");
    }

    let outcomes = run_parallel_batch(engine, &sets, threads, !quiet)?;
    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    println!("Runs: {} ({} rejected)", outcomes.len(), failed);

    let is_json = out.extension().is_some_and(|ext| ext == "json");
    if is_json {
        export_summaries_to_json(&outcomes, out).map_err(export_error)?;
    } else {
        export_summaries_to_csv(&outcomes, out).map_err(export_error)?;
    }
    tracing::info!(path = %out.display(), "wrote sweep summaries");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let engine = load_engine(cli.catalog.as_deref())?;
    match cli.command {
        Commands::Generate {
            num_users,
            min_movies,
            max_movies,
            seed,
            params,
            out_json,
            out_reviews_csv,
        } => generate(
            &engine,
            num_users,
            min_movies,
            max_movies,
            seed,
            params.as_deref(),
            out_json.as_deref(),
            out_reviews_csv.as_deref(),
        ),
        Commands::Sweep {
            num_users,
            min_movies,
            max_movies,
            seeds,
            threads,
            out,
            quiet,
        } => sweep(
            &engine, num_users, min_movies, max_movies, seeds, threads, &out, quiet,
        ),
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
