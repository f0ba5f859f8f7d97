//! # Recommendation Engine
//!
//! Coordinates one request end to end:
//! 1. Decide the path (oracle-known user or cold start)
//! 2. Build the user context
//! 3. Filter the catalog down to candidates
//! 4. Score candidates with the oracle
//! 5. Rank and select the top N
//! 6. Attach titles
//!
//! The engine is immutable once built and `Send + Sync`; a new dataset or
//! model means building a new engine.

use std::sync::Arc;
use std::time::Instant;

use data_loader::{Catalog, InteractionStore, ItemId, UserId};
use oracle::ScoringOracle;
use tracing::{debug, info, instrument, warn};

use crate::config::EngineConfig;
use crate::context::{UserContext, build_user_context};
use crate::error::{RecommendError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadySeenFilter, ReleaseYearFilter};
use crate::history;
use crate::popularity::PopularityRanker;
use crate::ranking::top_n;
use crate::scoring::score_candidates;
use crate::traits::Filter;
use crate::types::{HistoryEntry, RankOrigin, Recommendation, ScoredCandidate, UserSummary};

pub struct RecommendationEngine {
    store: Arc<InteractionStore>,
    catalog: Arc<Catalog>,
    /// `None` for popularity-only deployments
    oracle: Option<Arc<dyn ScoringOracle>>,
    popularity: PopularityRanker,
    filters: FilterPipeline,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Build an engine over an immutable snapshot.
    ///
    /// The popularity ranking is computed here, once. The candidate pipeline
    /// always starts with [`AlreadySeenFilter`], followed by a
    /// [`ReleaseYearFilter`] when `config.min_release_year` is set.
    ///
    /// Fails with [`RecommendError::InvalidArgument`] if `config` does not
    /// validate.
    pub fn new(
        store: Arc<InteractionStore>,
        catalog: Arc<Catalog>,
        oracle: Option<Arc<dyn ScoringOracle>>,
        config: EngineConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| RecommendError::InvalidArgument(format!("{:#}", e)))?;

        let popularity =
            PopularityRanker::new(&store, config.rating_scale, config.cold_start_confidence);

        let mut filters = FilterPipeline::new().add_filter(AlreadySeenFilter);
        if let Some(min_year) = config.min_release_year {
            filters = filters.add_filter(ReleaseYearFilter::new(&catalog, min_year));
        }

        info!(
            oracle = oracle.as_ref().map(|o| o.name()).unwrap_or("none"),
            items = catalog.len(),
            popular_items = popularity.len(),
            filters = ?filters,
            "Built recommendation engine"
        );

        Ok(Self {
            store,
            catalog,
            oracle,
            popularity,
            filters,
            config,
        })
    }

    /// Append an extra candidate filter (builder pattern)
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters = self.filters.add_filter(filter);
        self
    }

    /// Top `n` unseen items for `user_id`, most preferred first.
    ///
    /// Users the oracle does not know, and every user when no oracle is
    /// installed, get the cold-start ranking. An oracle failure degrades to
    /// cold start unless `fallback_on_oracle_error` is off, in which case it
    /// surfaces as [`RecommendError::ModelNotLoaded`].
    #[instrument(skip(self))]
    pub fn recommend(&self, user_id: UserId, n: usize) -> Result<Vec<Recommendation>> {
        check_limit(n)?;
        let start_time = Instant::now();

        let Some(oracle) = self.known_user_oracle(user_id) else {
            debug!("No personalized model for user {}, using cold start", user_id);
            return self.cold_start(user_id, n);
        };

        let recommendations = match self.personalized_with(oracle, user_id, n) {
            Err(RecommendError::ModelNotLoaded(reason)) if self.config.fallback_on_oracle_error => {
                warn!(
                    "Oracle {} failed for user {}, falling back to popularity: {}",
                    oracle.name(),
                    user_id,
                    reason
                );
                return self.cold_start(user_id, n);
            }
            result => result?,
        };

        info!(
            "Selected {} recommendations for user {} in {:.2?}",
            recommendations.len(),
            user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Personalized ranking only, never degrading to popularity.
    pub fn personalized(&self, user_id: UserId, n: usize) -> Result<Vec<Recommendation>> {
        check_limit(n)?;
        let oracle = self
            .oracle
            .as_deref()
            .ok_or_else(|| RecommendError::ModelNotLoaded("no oracle installed".to_string()))?;
        if !oracle.is_known_user(user_id) {
            return Err(RecommendError::UnknownUser(user_id));
        }
        self.personalized_with(oracle, user_id, n)
    }

    /// Popularity ranking excluding the user's seen items
    pub fn cold_start(&self, user_id: UserId, n: usize) -> Result<Vec<Recommendation>> {
        check_limit(n)?;
        let seen = self.store.seen_items(user_id);
        let ranked = self.popularity.rank_excluding(n, &seen);
        Ok(self.attach_titles(ranked, RankOrigin::ColdStart))
    }

    /// Popularity ranking with no user-specific exclusions
    pub fn popular(&self, n: usize) -> Result<Vec<Recommendation>> {
        check_limit(n)?;
        Ok(self.attach_titles(self.popularity.rank(n), RankOrigin::ColdStart))
    }

    pub fn user_history(&self, user_id: UserId) -> Vec<HistoryEntry> {
        history::user_history(&self.store, &self.catalog, &self.config, user_id)
    }

    pub fn user_summary(&self, user_id: UserId) -> UserSummary {
        history::user_summary(&self.store, &self.catalog, &self.config, user_id)
    }

    pub fn store(&self) -> &Arc<InteractionStore> {
        &self.store
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the installed oracle, if any
    pub fn oracle_name(&self) -> Option<&str> {
        self.oracle.as_deref().map(|oracle| oracle.name())
    }

    fn known_user_oracle(&self, user_id: UserId) -> Option<&dyn ScoringOracle> {
        self.oracle
            .as_deref()
            .filter(|oracle| oracle.is_known_user(user_id))
    }

    fn personalized_with(
        &self,
        oracle: &dyn ScoringOracle,
        user_id: UserId,
        n: usize,
    ) -> Result<Vec<Recommendation>> {
        let context = build_user_context(&self.store, user_id);
        let candidates = self.candidates(&context)?;
        if candidates.is_empty() {
            debug!("User {} has no unseen candidates", user_id);
            return Ok(Vec::new());
        }

        let scored = score_candidates(oracle, user_id, &candidates)
            .map_err(|e| RecommendError::ModelNotLoaded(e.to_string()))?;
        let ranked = top_n(scored, n);
        Ok(self.attach_titles(ranked, RankOrigin::Personalized))
    }

    fn candidates(&self, context: &UserContext) -> Result<Vec<ItemId>> {
        self.filters
            .apply(self.catalog.item_ids().to_vec(), context)
            .map_err(|e| RecommendError::Filter(format!("{:#}", e)))
    }

    fn attach_titles(&self, ranked: Vec<ScoredCandidate>, origin: RankOrigin) -> Vec<Recommendation> {
        ranked
            .into_iter()
            .map(|candidate| Recommendation {
                item_id: candidate.item_id,
                title: self.title_of(candidate.item_id),
                display_score: candidate.display_score,
                confidence: candidate.confidence,
                origin,
            })
            .collect()
    }

    pub(crate) fn title_of(&self, item_id: ItemId) -> String {
        match self.catalog.title(item_id) {
            Some(title) => title.to_string(),
            None => self.config.placeholder_title(item_id),
        }
    }
}

impl std::fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("oracle", &self.oracle_name())
            .field("items", &self.catalog.len())
            .field("filters", &self.filters)
            .field("config", &self.config)
            .finish()
    }
}

fn check_limit(n: usize) -> Result<()> {
    if n == 0 {
        return Err(RecommendError::InvalidArgument(
            "n must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Interaction, Item, RatingScale};
    use oracle::{BaselineOracle, Calibration, OracleError};

    struct FailingOracle;

    impl ScoringOracle for FailingOracle {
        fn name(&self) -> &str {
            "failing"
        }

        fn is_known_user(&self, _user_id: UserId) -> bool {
            true
        }

        fn predict(&self, _user_id: UserId, _item_id: ItemId) -> oracle::Result<f32> {
            Err(OracleError::Unavailable("connection refused".to_string()))
        }

        fn score_scale_bounds(&self) -> RatingScale {
            RatingScale::default()
        }

        fn calibration(&self) -> Calibration {
            Calibration::Constant(0.8)
        }
    }

    fn item(id: ItemId, title: &str, year: Option<u16>) -> Item {
        Item {
            id,
            title: title.to_string(),
            year,
            genres: vec![],
        }
    }

    fn fixture() -> (Arc<InteractionStore>, Arc<Catalog>) {
        let store = InteractionStore::new(vec![
            Interaction::new(1, 1, 5.0),
            Interaction::new(2, 1, 4.0),
            Interaction::new(2, 2, 2.0),
            Interaction::new(3, 3, 5.0),
        ]);
        let catalog = Catalog::new(vec![
            item(1, "Old Classic (1950)", Some(1950)),
            item(2, "Middling (1990)", Some(1990)),
            item(3, "New Hit (2000)", Some(2000)),
            item(4, "Unrated (1999)", Some(1999)),
        ]);
        (Arc::new(store), Arc::new(catalog))
    }

    fn engine_with(oracle: Option<Arc<dyn ScoringOracle>>, config: EngineConfig) -> RecommendationEngine {
        let (store, catalog) = fixture();
        RecommendationEngine::new(store, catalog, oracle, config).unwrap()
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let engine = engine_with(None, EngineConfig::default());
        assert!(matches!(
            engine.recommend(1, 0),
            Err(RecommendError::InvalidArgument(_))
        ));
        assert!(matches!(engine.popular(0), Err(RecommendError::InvalidArgument(_))));
    }

    #[test]
    fn test_without_oracle_everything_is_cold_start() {
        let engine = engine_with(None, EngineConfig::default());
        let recs = engine.recommend(1, 10).unwrap();

        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.origin == RankOrigin::ColdStart));
        assert!(recs.iter().all(|r| r.item_id != 1));
        assert_eq!(engine.oracle_name(), None);
    }

    #[test]
    fn test_baseline_oracle_personalizes_known_users() {
        let (store, catalog) = fixture();
        let oracle = BaselineOracle::from_store(&store, RatingScale::default());
        let engine =
            RecommendationEngine::new(store, catalog, Some(Arc::new(oracle)), EngineConfig::default())
                .unwrap();

        let recs = engine.recommend(1, 10).unwrap();
        assert_eq!(recs.len(), 3);
        assert!(recs.iter().all(|r| r.origin == RankOrigin::Personalized));
        assert!(recs.iter().all(|r| r.item_id != 1));

        // User 42 has no ratings, so the baseline does not know them
        let recs = engine.recommend(42, 10).unwrap();
        assert!(recs.iter().all(|r| r.origin == RankOrigin::ColdStart));
    }

    #[test]
    fn test_failure_degrades_by_default() {
        let engine = engine_with(Some(Arc::new(FailingOracle)), EngineConfig::default());
        let recs = engine.recommend(1, 10).unwrap();
        assert!(recs.iter().all(|r| r.origin == RankOrigin::ColdStart));
        assert!(recs.iter().all(|r| r.confidence == 0.5));
    }

    #[test]
    fn test_failure_surfaces_when_fallback_disabled() {
        let config = EngineConfig::default().with_fallback_on_oracle_error(false);
        let engine = engine_with(Some(Arc::new(FailingOracle)), config);

        match engine.recommend(1, 10) {
            Err(RecommendError::ModelNotLoaded(reason)) => {
                assert!(reason.contains("connection refused"))
            }
            other => panic!("expected ModelNotLoaded, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_path_errors() {
        let engine = engine_with(None, EngineConfig::default());
        assert!(matches!(
            engine.personalized(1, 5),
            Err(RecommendError::ModelNotLoaded(_))
        ));

        let (store, catalog) = fixture();
        let oracle = BaselineOracle::from_store(&store, RatingScale::default());
        let engine =
            RecommendationEngine::new(store, catalog, Some(Arc::new(oracle)), EngineConfig::default())
                .unwrap();
        assert_eq!(engine.personalized(42, 5), Err(RecommendError::UnknownUser(42)));
    }

    #[test]
    fn test_release_year_floor_applies_to_personalized() {
        let (store, catalog) = fixture();
        let oracle = BaselineOracle::from_store(&store, RatingScale::default());
        let config = EngineConfig::default().with_min_release_year(Some(1995));
        let engine = RecommendationEngine::new(store, catalog, Some(Arc::new(oracle)), config).unwrap();

        let ids: Vec<ItemId> = engine.recommend(1, 10).unwrap().iter().map(|r| r.item_id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(sorted, vec![3, 4]);
    }

    #[test]
    fn test_placeholder_title_for_uncataloged_item() {
        let store = Arc::new(InteractionStore::new(vec![Interaction::new(1, 77, 4.0)]));
        let catalog = Arc::new(Catalog::new(vec![item(1, "Only (1990)", Some(1990))]));
        let engine = RecommendationEngine::new(store, catalog, None, EngineConfig::default()).unwrap();

        let recs = engine.popular(5).unwrap();
        assert_eq!(recs[0].item_id, 77);
        assert_eq!(recs[0].title, "Movie 77");
    }

    #[test]
    fn test_invalid_config_is_rejected_at_build() {
        let bad_configs = [
            EngineConfig::default().with_cold_start_confidence(2.5),
            EngineConfig::default().with_rating_scale(RatingScale::new(5.0, 1.0)),
        ];
        for config in bad_configs {
            let (store, catalog) = fixture();
            let result = RecommendationEngine::new(store, catalog, None, config);
            assert!(matches!(result, Err(RecommendError::InvalidArgument(_))));
        }
    }
}
