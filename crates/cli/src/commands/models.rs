//! Model check command.
//!
//! Loads the crop disease classifier and the crop recommender the same way
//! the server does at startup, so a bad export is caught before deploy.

use std::path::PathBuf;

use farm_market::config::{ConfigError, ModelConfig};
use farm_market::services::disease::{DiseaseClassifier, InferenceError, OnnxClassifier};
use farm_market::services::recommend::{CropRecommender, RecommendError};
use thiserror::Error;

/// Errors that can occur while checking models.
#[derive(Debug, Error)]
pub enum ModelsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Disease model: {0}")]
    Disease(#[from] InferenceError),

    #[error("Crop recommender: {0}")]
    Recommender(#[from] RecommendError),
}

/// Summary of the loaded models.
#[derive(Debug)]
pub struct ModelReport {
    pub disease_model_path: PathBuf,
    pub image_size: u32,
    pub recommender: CropRecommender,
}

impl ModelReport {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "disease model: {} ({}x{} RGB)",
            self.disease_model_path.display(),
            self.image_size,
            self.image_size
        )];

        match &self.recommender {
            CropRecommender::Unfitted => {
                lines.push("crop recommender: not trained (requests return 503)".to_string());
            }
            CropRecommender::Forest(forest) => {
                lines.push(format!(
                    "crop recommender: {} trees, classes [{}], soil types [{}]",
                    forest.tree_count(),
                    forest.classes().join(", "),
                    forest.soil_types().join(", ")
                ));
            }
        }

        lines
    }
}

/// Load both models from the environment configuration and print a summary.
///
/// # Errors
///
/// Returns `ModelsError` if the configuration is invalid or a model fails to load.
pub fn check() -> Result<(), ModelsError> {
    let _ = dotenvy::dotenv();
    let config = ModelConfig::from_env()?;
    let report = load(&config)?;

    #[allow(clippy::print_stdout)]
    for line in report.lines() {
        println!("{line}");
    }

    Ok(())
}

fn load(config: &ModelConfig) -> Result<ModelReport, ModelsError> {
    let recommender = CropRecommender::load(config.recommender_model_path.as_deref())?;
    let classifier = OnnxClassifier::load(&config.disease_model_path, config.disease_image_size)?;

    Ok(ModelReport {
        disease_model_path: config.disease_model_path.clone(),
        image_size: classifier.image_size(),
        recommender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_disease_model_fails() {
        let config = ModelConfig {
            disease_model_path: PathBuf::from("missing/crop_disease_model.onnx"),
            ..ModelConfig::default()
        };
        assert!(matches!(load(&config), Err(ModelsError::Disease(_))));
    }

    #[test]
    fn test_missing_recommender_file_fails() {
        let config = ModelConfig {
            recommender_model_path: Some(PathBuf::from("missing/forest.json")),
            ..ModelConfig::default()
        };
        assert!(matches!(load(&config), Err(ModelsError::Recommender(_))));
    }

    #[test]
    fn test_report_describes_unfitted_recommender() {
        let report = ModelReport {
            disease_model_path: PathBuf::from("crop_disease_model.onnx"),
            image_size: 256,
            recommender: CropRecommender::Unfitted,
        };
        let lines = report.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.last().is_some_and(|l| l.contains("not trained")));
    }
}
