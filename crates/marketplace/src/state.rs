//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::MarketConfig;
use crate::services::disease::{DiseaseClassifier, InferenceError, OnnxClassifier};
use crate::services::recommend::{CropRecommender, RecommendError};

/// Error loading the models at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("disease model: {0}")]
    Disease(#[from] InferenceError),
    #[error("crop recommender: {0}")]
    Recommender(#[from] RecommendError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections, configuration and the
/// loaded models.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MarketConfig,
    pool: PgPool,
    disease: Arc<dyn DiseaseClassifier>,
    recommender: CropRecommender,
}

impl AppState {
    /// Create a new application state, loading both models from the
    /// configured paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the disease model cannot be loaded, or if a
    /// recommender path is configured but the file is unusable.
    pub fn new(config: MarketConfig, pool: PgPool) -> Result<Self, ModelLoadError> {
        let models = &config.models;
        let disease = OnnxClassifier::load(&models.disease_model_path, models.disease_image_size)?;
        let recommender = CropRecommender::load(models.recommender_model_path.as_deref())?;

        Ok(Self::with_models(config, pool, Arc::new(disease), recommender))
    }

    /// Create application state from already-loaded models.
    #[must_use]
    pub fn with_models(
        config: MarketConfig,
        pool: PgPool,
        disease: Arc<dyn DiseaseClassifier>,
        recommender: CropRecommender,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                disease,
                recommender,
            }),
        }
    }

    /// Get a reference to the marketplace configuration.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Shared handle to the disease classifier.
    #[must_use]
    pub fn disease(&self) -> Arc<dyn DiseaseClassifier> {
        Arc::clone(&self.inner.disease)
    }

    /// Get a reference to the crop recommender.
    #[must_use]
    pub fn recommender(&self) -> &CropRecommender {
        &self.inner.recommender
    }
}
