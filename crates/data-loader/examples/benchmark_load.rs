use data_loader::Dataset;
use std::path::Path;
use std::time::Instant;

fn main() -> data_loader::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let data_dir = Path::new("data/ml-100k");

    println!("Loading MovieLens dataset...\n");

    let start = Instant::now();
    let dataset = Dataset::load_from_dir(data_dir)?;
    let elapsed = start.elapsed();

    let (users, items, ratings) = dataset.interactions.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Rated items: {}", items);
    println!("Catalog items: {}", dataset.catalog.len());
    println!("Ratings: {}", ratings);
    println!(
        "\nPerformance: {:.0} ratings/second",
        ratings as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
