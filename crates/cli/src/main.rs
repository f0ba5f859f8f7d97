use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{Catalog, UserId};
use engine::{EngineConfig, RankOrigin, Recommendation};
use rand::seq::IndexedRandom;
use server::{DEFAULT_MAX_IN_FLIGHT_SCORING, DatasetProvider, OracleBackend, RecommendationService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Movie recommendations from a latent-factor model with popularity fallback", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory (100k or 1M layout)
    #[arg(short, long, default_value = "data/ml-100k")]
    data_dir: PathBuf,

    /// Scoring backend
    #[arg(long, value_enum, default_value_t = Backend::Baseline)]
    backend: Backend,

    /// JSON engine config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve cold-start results when scoring takes longer than this
    #[arg(long)]
    oracle_timeout_ms: Option<u64>,

    /// Scoring tasks allowed on the blocking pool at once
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT_SCORING)]
    max_in_flight: usize,

    /// Skip personalized candidates released before this year
    #[arg(long)]
    min_release_year: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// Damped-mean baseline estimated from the ratings
    Baseline,
    /// Popularity ranking for every user
    Popularity,
}

impl From<Backend> for OracleBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Baseline => OracleBackend::Baseline,
            Backend::Popularity => OracleBackend::PopularityOnly,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Show origin and confidence for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Show a user's rating history
    History {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,

        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show a user's profile summary
    Profile {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let service = Arc::new(build_service(&cli).await?);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            explain,
        } => handle_recommend(&service, user_id, limit, explain).await?,
        Commands::History { user_id, limit } => handle_history(&service, user_id, limit).await?,
        Commands::Profile { user_id } => handle_profile(&service, user_id).await?,
        Commands::Search { title } => handle_search(&service, &title).await?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(service, requests, concurrent).await?,
    }

    Ok(())
}

/// Load the config and dataset, and install the first engine
async fn build_service(cli: &Cli) -> Result<RecommendationService> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if cli.min_release_year.is_some() {
        config = config.with_min_release_year(cli.min_release_year);
    }

    let mut service = RecommendationService::new(config).with_max_in_flight_scoring(cli.max_in_flight);
    if let Some(ms) = cli.oracle_timeout_ms {
        service = service.with_oracle_timeout(Duration::from_millis(ms));
    }

    // Load dataset (this may take a moment)
    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let provider = Arc::new(DatasetProvider::new(&cli.data_dir, cli.backend.into()));
    service
        .reload(provider)
        .await
        .context("Failed to load MovieLens dataset")?;
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    Ok(service)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    service: &RecommendationService,
    user_id: UserId,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let engine = service.current().await?;
    let recommendations = service.recommend(user_id, limit).await?;

    if recommendations.is_empty() {
        println!("{}", format!("User {} has seen everything we have.", user_id).yellow());
        return Ok(());
    }
    print_recommendations(&recommendations, engine.catalog(), explain);
    Ok(())
}

/// Handle the 'history' command
async fn handle_history(service: &RecommendationService, user_id: UserId, limit: usize) -> Result<()> {
    let history = service.user_history(user_id).await?;
    if history.is_empty() {
        bail!("User {} has no ratings", user_id);
    }

    println!("{}", format!("Ratings by user {} ({} total):", user_id, history.len()).bold().blue());
    for entry in history.iter().take(limit) {
        println!(
            "  {} {} {}",
            format!("{:.1}", entry.rating).cyan(),
            entry.title,
            format!("#{}", entry.item_id).dimmed()
        );
    }
    Ok(())
}

/// Handle the 'profile' command
async fn handle_profile(service: &RecommendationService, user_id: UserId) -> Result<()> {
    let summary = service.user_summary(user_id).await?;
    if summary.rated_count == 0 {
        bail!("User {} has no ratings", user_id);
    }

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Number of ratings: {}", "• ".cyan(), summary.rated_count);
    println!("{}Average rating: {:.2}", "• ".cyan(), summary.avg_rating);
    if let Some(genre) = summary.favorite_genre {
        println!("{}Favorite genre: {:?}", "• ".cyan(), genre);
    }

    println!("Rating distribution:");
    let widest = summary.rating_histogram.iter().copied().max().unwrap_or(0).max(1);
    for (stars, count) in summary.rating_histogram.iter().enumerate() {
        let bar = "#".repeat((*count as usize * 40).div_ceil(widest as usize));
        println!("  {} {:>5} {}", stars + 1, count, bar.green());
    }

    println!("Genres rated:");
    let mut genres: Vec<_> = summary.genre_counts.iter().collect();
    genres.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (genre, count) in genres {
        println!("  - {:?}: {}", genre, count);
    }
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(service: &RecommendationService, title: &str) -> Result<()> {
    let engine = service.current().await?;
    let matches = service.search_titles(title, 20).await?;

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for item in matches {
        let genres = item
            .genres
            .iter()
            .map(|g| format!("{:?}", g))
            .collect::<Vec<_>>()
            .join(", ");
        let stats = engine.store().item_stats(item.id);
        println!(
            "{}: {} [{}] avg {:.2} ({} ratings)",
            item.id,
            item.title,
            genres,
            stats.map(|s| s.avg_rating).unwrap_or(0.0),
            stats.map(|s| s.rating_count).unwrap_or(0)
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: Arc<RecommendationService>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must both be at least 1");
    }

    let engine = service.current().await?;
    let known_users = engine.store().user_ids();
    if known_users.is_empty() {
        bail!("Dataset has no users to benchmark");
    }

    // Draw users from the dataset, plus one id past the end to hit cold start
    let cold_user = known_users.last().copied().unwrap_or(0) + 1;
    let user_ids: Vec<UserId> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|i| {
                if i % 10 == 9 {
                    cold_user
                } else {
                    known_users.choose(&mut rng).copied().unwrap_or(cold_user)
                }
            })
            .collect()
    };

    info!("Running {} requests, {} at a time", requests, concurrent);
    let semaphore = Arc::new(Semaphore::new(concurrent));
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for user_id in user_ids {
        let service = service.clone();
        let permit = semaphore.clone().acquire_owned().await?;
        handles.push(tokio::spawn(async move {
            let _permit = permit;
            let start = Instant::now();
            let recommendations = service.recommend(user_id, 20).await?;
            Ok::<_, anyhow::Error>((start.elapsed(), recommendations))
        }));
    }

    let mut timings = Vec::with_capacity(handles.len());
    let mut cold_starts = 0;
    for handle in handles {
        let (elapsed, recommendations) = handle.await??;
        if recommendations.iter().any(|r| r.origin == RankOrigin::ColdStart) {
            cold_starts += 1;
        }
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p).round() as usize];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);
    println!("Cold-start responses: {}", cold_starts);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation], catalog: &Catalog, explain: bool) {
    print!("{}", "Movie Recommendations:\n".bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        let genres = catalog
            .get(rec.item_id)
            .map(|item| {
                item.genres
                    .iter()
                    .map(|g| format!("{:?}", g))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "{}. {} [{}] - Score: {:.2}",
            (i + 1).to_string().green(),
            rec.title,
            genres,
            rec.display_score
        );
        if explain {
            let origin = match rec.origin {
                RankOrigin::Personalized => "personalized".cyan(),
                RankOrigin::ColdStart => "popular".yellow(),
            };
            println!(
                "   {} item #{}, confidence {:.2}",
                origin, rec.item_id, rec.confidence
            );
        }
    }
}
