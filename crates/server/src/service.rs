//! # Recommendation Service
//!
//! Async front of the engine. Holds the current engine behind a
//! `tokio::sync::RwLock`; readers clone the `Arc` and drop the lock at once,
//! so a reload never blocks on in-flight requests and never exposes a
//! half-built engine.
//!
//! Engine work runs on `spawn_blocking`, at most `max_in_flight_scoring`
//! tasks at a time. With an oracle deadline set, a request that misses it
//! (waiting for a slot included) is answered from the cold-start ranking
//! instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use data_loader::{Item, UserId};
use engine::{
    EngineConfig, HistoryEntry, RecommendError, Recommendation, RecommendationEngine, UserSummary,
};
use thiserror::Error;
use tokio::sync::{AcquireError, RwLock, Semaphore};
use tokio::task::JoinError;
use tracing::{info, instrument, warn};

use crate::provider::{ModelProvider, ModelSnapshot, ProviderError};

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Nothing installed yet
    #[error("No model loaded")]
    ModelNotLoaded,

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A blocking task panicked or was cancelled
    #[error("Engine task failed: {0}")]
    Task(#[from] JoinError),

    #[error("Scoring slots closed: {0}")]
    Capacity(#[from] AcquireError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Blocking scoring tasks allowed to run at once
pub const DEFAULT_MAX_IN_FLIGHT_SCORING: usize = 64;

pub struct RecommendationService {
    engine: RwLock<Option<Arc<RecommendationEngine>>>,
    config: EngineConfig,
    oracle_timeout: Option<Duration>,
    scoring_permits: Arc<Semaphore>,
}

impl RecommendationService {
    /// Create an empty service; call [`install`](Self::install) or
    /// [`reload`](Self::reload) before serving.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: RwLock::new(None),
            config,
            oracle_timeout: None,
            scoring_permits: Arc::new(Semaphore::new(DEFAULT_MAX_IN_FLIGHT_SCORING)),
        }
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = Some(timeout);
        self
    }

    /// Cap on scoring tasks occupying the blocking pool. Abandoned tasks
    /// hold their slot until they finish.
    pub fn with_max_in_flight_scoring(mut self, max: usize) -> Self {
        self.scoring_permits = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    /// Build an engine from `snapshot` and make it current.
    ///
    /// An invalid config leaves the current engine in place.
    pub async fn install(&self, snapshot: ModelSnapshot) -> Result<Arc<RecommendationEngine>> {
        let engine = Arc::new(build_engine(snapshot, self.config.clone())?);
        self.swap(engine.clone()).await;
        Ok(engine)
    }

    /// Load a fresh snapshot and swap it in.
    ///
    /// Loading and engine construction finish before the write lock is
    /// taken. On failure the previous engine stays in place.
    pub async fn reload(&self, provider: Arc<dyn ModelProvider>) -> Result<()> {
        let start_time = Instant::now();
        let config = self.config.clone();
        let engine = tokio::task::spawn_blocking(move || -> Result<RecommendationEngine> {
            let snapshot = provider.load()?;
            build_engine(snapshot, config)
        })
        .await?
        .inspect_err(|e| warn!("Reload failed, keeping current model: {}", e))?;

        self.swap(Arc::new(engine)).await;
        info!("Reloaded model in {:.2?}", start_time.elapsed());
        Ok(())
    }

    pub async fn is_ready(&self) -> bool {
        self.engine.read().await.is_some()
    }

    /// The engine currently serving requests
    pub async fn current(&self) -> Result<Arc<RecommendationEngine>> {
        self.engine
            .read()
            .await
            .clone()
            .ok_or(ServiceError::ModelNotLoaded)
    }

    #[instrument(skip(self))]
    pub async fn recommend(&self, user_id: UserId, n: usize) -> Result<Vec<Recommendation>> {
        let engine = self.current().await?;
        let scoring = self.score_on_blocking_pool(engine.clone(), user_id, n);

        let Some(deadline) = self.oracle_timeout else {
            return scoring.await;
        };

        match tokio::time::timeout(deadline, scoring).await {
            Ok(result) => result,
            Err(_) => {
                // A task already started keeps running on the blocking pool;
                // its result is discarded.
                warn!(
                    "Oracle missed the {:?} deadline for user {}, serving cold start",
                    deadline, user_id
                );
                Ok(engine.cold_start(user_id, n)?)
            }
        }
    }

    pub async fn user_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>> {
        Ok(self.current().await?.user_history(user_id))
    }

    pub async fn user_summary(&self, user_id: UserId) -> Result<UserSummary> {
        Ok(self.current().await?.user_summary(user_id))
    }

    /// Catalog items whose title matches `query`, exact matches first
    pub async fn search_titles(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        let engine = self.current().await?;
        Ok(engine
            .catalog()
            .search_titles(query, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn score_on_blocking_pool(
        &self,
        engine: Arc<RecommendationEngine>,
        user_id: UserId,
        n: usize,
    ) -> Result<Vec<Recommendation>> {
        let permit = self.scoring_permits.clone().acquire_owned().await?;
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            engine.recommend(user_id, n)
        });
        Ok(task.await??)
    }

    async fn swap(&self, engine: Arc<RecommendationEngine>) {
        let previous = self.engine.write().await.replace(engine);
        if previous.is_some() {
            info!("Replaced serving engine");
        }
    }
}

fn build_engine(snapshot: ModelSnapshot, config: EngineConfig) -> Result<RecommendationEngine> {
    Ok(RecommendationEngine::new(
        snapshot.store,
        snapshot.catalog,
        snapshot.oracle,
        config,
    )?)
}
