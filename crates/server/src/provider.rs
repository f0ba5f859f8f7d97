//! Model providers: where the service gets its data and oracle from.

use data_loader::{Catalog, DataLoadError, Dataset, InteractionStore};
use oracle::{BaselineOracle, ScoringOracle};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to load dataset: {0}")]
    Data(#[from] DataLoadError),
}

/// Everything one engine is built from. Replaced as a unit.
#[derive(Clone)]
pub struct ModelSnapshot {
    pub store: Arc<InteractionStore>,
    pub catalog: Arc<Catalog>,
    pub oracle: Option<Arc<dyn ScoringOracle>>,
}

impl std::fmt::Debug for ModelSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSnapshot")
            .field("items", &self.catalog.len())
            .field("interactions", &self.store.counts().2)
            .field("oracle", &self.oracle.as_ref().map(|o| o.name()))
            .finish()
    }
}

/// Loads a complete snapshot. Called off the async runtime.
pub trait ModelProvider: Send + Sync {
    fn load(&self) -> Result<ModelSnapshot, ProviderError>;
}

/// Which oracle a [`DatasetProvider`] builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleBackend {
    /// Damped-mean baseline estimated from the loaded ratings
    #[default]
    Baseline,
    /// No oracle; every user gets the popularity ranking
    PopularityOnly,
}

/// Loads a MovieLens directory (100k or 1M layout)
#[derive(Debug, Clone)]
pub struct DatasetProvider {
    data_dir: PathBuf,
    backend: OracleBackend,
}

impl DatasetProvider {
    pub fn new(data_dir: impl Into<PathBuf>, backend: OracleBackend) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend,
        }
    }
}

impl ModelProvider for DatasetProvider {
    fn load(&self) -> Result<ModelSnapshot, ProviderError> {
        let start_time = Instant::now();
        let dataset = Dataset::load_from_dir(&self.data_dir)?;
        let store = Arc::new(dataset.interactions);

        let oracle: Option<Arc<dyn ScoringOracle>> = match self.backend {
            OracleBackend::Baseline => {
                Some(Arc::new(BaselineOracle::from_store(&store, dataset.scale)))
            }
            OracleBackend::PopularityOnly => None,
        };

        info!(
            "Loaded snapshot from {} ({:?} backend) in {:.2?}",
            self.data_dir.display(),
            self.backend,
            start_time.elapsed()
        );
        Ok(ModelSnapshot {
            store,
            catalog: Arc::new(dataset.catalog),
            oracle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_ml100k(dir: &std::path::Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("u.data"), "1\t1\t5\t881250949\n2\t1\t4\t881250950\n2\t2\t3\t881250951\n")
            .unwrap();
        let flags = "|0".repeat(19);
        fs::write(
            dir.join("u.item"),
            format!(
                "1|Toy Story (1995)|01-Jan-1995||http://example.com{flags}\n\
                 2|GoldenEye (1995)|01-Jan-1995||http://example.com{flags}\n"
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_dataset_provider_backends() {
        let dir = std::env::temp_dir().join(format!("server-provider-{}", std::process::id()));
        write_ml100k(&dir);

        let snapshot = DatasetProvider::new(&dir, OracleBackend::Baseline).load().unwrap();
        assert_eq!(snapshot.catalog.len(), 2);
        assert_eq!(snapshot.oracle.as_ref().map(|o| o.name()), Some("baseline"));

        let snapshot = DatasetProvider::new(&dir, OracleBackend::PopularityOnly).load().unwrap();
        assert!(snapshot.oracle.is_none());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir_is_data_error() {
        let err = DatasetProvider::new("/nonexistent/reel-recs", OracleBackend::Baseline)
            .load()
            .unwrap_err();
        assert!(matches!(err, ProviderError::Data(_)));
    }
}
