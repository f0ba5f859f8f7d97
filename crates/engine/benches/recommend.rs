//! Benchmarks for the recommendation path
//!
//! Run with: cargo bench --package engine
//!
//! Uses a synthetic dataset so it runs without MovieLens files on disk.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{Catalog, Interaction, InteractionStore, Item, RatingScale};
use engine::{EngineConfig, PopularityRanker, RecommendationEngine, build_user_context};
use oracle::BaselineOracle;
use std::sync::Arc;

const USERS: u32 = 1_000;
const ITEMS: u32 = 2_000;

fn create_bench_data() -> (Arc<InteractionStore>, Arc<Catalog>) {
    let interactions = (1..=USERS).flat_map(|user| {
        (0..50u32).map(move |k| {
            let item = (user * 31 + k * 97) % ITEMS + 1;
            let rating = ((user + k) % 5 + 1) as f32;
            Interaction::new(user, item, rating)
        })
    });
    let catalog = Catalog::new((1..=ITEMS).map(|id| Item {
        id,
        title: format!("Movie {}", id),
        year: Some(1950 + (id % 50) as u16),
        genres: vec![],
    }));
    (Arc::new(InteractionStore::new(interactions)), Arc::new(catalog))
}

fn bench_recommend_personalized(c: &mut Criterion) {
    let (store, catalog) = create_bench_data();
    let oracle = BaselineOracle::from_store(&store, RatingScale::default());
    let engine = RecommendationEngine::new(store, catalog, Some(Arc::new(oracle)), EngineConfig::default()).unwrap();

    c.bench_function("recommend_personalized", |b| {
        b.iter(|| {
            let recs = engine.recommend(black_box(42), black_box(20)).unwrap();
            black_box(recs)
        })
    });
}

fn bench_recommend_cold_start(c: &mut Criterion) {
    let (store, catalog) = create_bench_data();
    let engine = RecommendationEngine::new(store, catalog, None, EngineConfig::default()).unwrap();

    c.bench_function("recommend_cold_start", |b| {
        b.iter(|| {
            let recs = engine.recommend(black_box(42), black_box(20)).unwrap();
            black_box(recs)
        })
    });
}

fn bench_build_popularity_ranker(c: &mut Criterion) {
    let (store, _) = create_bench_data();

    c.bench_function("build_popularity_ranker", |b| {
        b.iter(|| {
            let ranker = PopularityRanker::new(black_box(&store), RatingScale::default(), 0.5);
            black_box(ranker)
        })
    });
}

fn bench_build_user_context(c: &mut Criterion) {
    let (store, _) = create_bench_data();

    c.bench_function("build_user_context", |b| {
        b.iter(|| {
            let context = build_user_context(&store, black_box(1));
            black_box(context)
        })
    });
}

criterion_group!(
    benches,
    bench_recommend_personalized,
    bench_recommend_cold_start,
    bench_build_popularity_ranker,
    bench_build_user_context
);
criterion_main!(benches);
