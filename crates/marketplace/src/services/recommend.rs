//! Crop recommendation from soil and weather features.
//!
//! The recommender is either `Unfitted`, in which case every request is
//! refused, or a random forest exported to JSON:
//!
//! ```json
//! {
//!   "classes": ["maize", "rice"],
//!   "soil_types": ["clay", "loam", "sandy"],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 1, "threshold": 120.0, "left": 1, "right": 2 },
//!         { "value": [8.0, 2.0] },
//!         { "value": [1.0, 9.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Feature order is `[soil_code, rainfall, temperature, humidity]`, where
//! `soil_code` is the index of the soil type in `soil_types`.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Number of input features per row.
pub const FEATURE_COUNT: usize = 4;

/// Errors that can occur while loading or querying the recommender.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// No fitted model is configured.
    #[error("Crop recommendation model has not been trained")]
    NotFitted,

    /// Soil type was not seen when the model was fitted.
    #[error("Unknown soil type: {0}")]
    UnknownSoilType(String),

    /// A numeric feature is NaN or infinite.
    #[error("Invalid value for {0}")]
    InvalidFeature(&'static str),

    /// Model file is structurally invalid.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Model file could not be read.
    #[error("failed to read model {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Model file is not valid JSON.
    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One row of recommendation input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CropFeatures {
    pub soil_type: String,
    pub rainfall: f64,
    pub temperature: f64,
    pub humidity: f64,
}

/// A decision tree node.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

/// A fitted random forest classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    classes: Vec<String>,
    soil_types: Vec<String>,
    trees: Vec<Tree>,
}

impl RandomForest {
    /// Parse and validate an exported forest.
    ///
    /// # Errors
    ///
    /// Returns `RecommendError::Parse` for malformed JSON and
    /// `RecommendError::InvalidModel` if the forest cannot be evaluated.
    pub fn from_json(json: &str) -> Result<Self, RecommendError> {
        let forest: Self = serde_json::from_str(json)?;
        forest.validate()?;
        Ok(forest)
    }

    /// Class labels in output order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Soil types known to the model, in encoding order.
    #[must_use]
    pub fn soil_types(&self) -> &[String] {
        &self.soil_types
    }

    /// Number of trees in the forest.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), RecommendError> {
        let invalid = |msg: String| Err(RecommendError::InvalidModel(msg));

        if self.classes.is_empty() {
            return invalid("no classes".to_string());
        }
        if self.soil_types.is_empty() {
            return invalid("no soil types".to_string());
        }
        if self.trees.is_empty() {
            return invalid("no trees".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return invalid(format!("tree {t} has no nodes"));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return invalid(format!("tree {t} node {i}: feature {feature} out of range"));
                        }
                        if !threshold.is_finite() {
                            return invalid(format!("tree {t} node {i}: threshold is not finite"));
                        }
                        // Children must come after their parent so every walk terminates
                        for child in [*left, *right] {
                            if child <= i || child >= tree.nodes.len() {
                                return invalid(format!("tree {t} node {i}: bad child {child}"));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return invalid(format!(
                                "tree {t} node {i}: expected {} class weights, got {}",
                                self.classes.len(),
                                value.len()
                            ));
                        }
                        if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                            return invalid(format!("tree {t} node {i}: bad class weight"));
                        }
                        if value.iter().sum::<f64>() <= 0.0 {
                            return invalid(format!("tree {t} node {i}: empty leaf"));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn encode(&self, features: &CropFeatures) -> Result<[f64; FEATURE_COUNT], RecommendError> {
        let soil_code = self
            .soil_types
            .iter()
            .position(|s| s == &features.soil_type)
            .ok_or_else(|| RecommendError::UnknownSoilType(features.soil_type.clone()))?;

        for (name, value) in [
            ("rainfall", features.rainfall),
            ("temperature", features.temperature),
            ("humidity", features.humidity),
        ] {
            if !value.is_finite() {
                return Err(RecommendError::InvalidFeature(name));
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let soil_code = soil_code as f64;

        Ok([
            soil_code,
            features.rainfall,
            features.temperature,
            features.humidity,
        ])
    }

    /// Average per-tree class probabilities for one encoded row.
    fn probabilities(&self, row: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>, RecommendError> {
        let mut totals = vec![0.0; self.classes.len()];

        for tree in &self.trees {
            let leaf = tree.leaf_for(row)?;
            let sum: f64 = leaf.iter().sum();
            for (total, weight) in totals.iter_mut().zip(leaf) {
                *total += weight / sum;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let count = self.trees.len() as f64;
        for total in &mut totals {
            *total /= count;
        }

        Ok(totals)
    }

    /// Predict the crop label for one row of features.
    ///
    /// # Errors
    ///
    /// Returns `RecommendError::UnknownSoilType` or
    /// `RecommendError::InvalidFeature` for unusable input.
    pub fn predict(&self, features: &CropFeatures) -> Result<&str, RecommendError> {
        let row = self.encode(features)?;
        let probabilities = self.probabilities(&row)?;

        let mut best: Option<(usize, f64)> = None;
        for (index, &p) in probabilities.iter().enumerate() {
            match best {
                Some((_, top)) if p <= top => {}
                _ => best = Some((index, p)),
            }
        }

        best.and_then(|(index, _)| self.classes.get(index))
            .map(String::as_str)
            .ok_or_else(|| RecommendError::InvalidModel("no classes".to_string()))
    }
}

impl Tree {
    fn leaf_for(&self, row: &[f64; FEATURE_COUNT]) -> Result<&[f64], RecommendError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().unwrap_or(f64::NAN);
                    index = if value <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { value }) => return Ok(value),
                None => {
                    return Err(RecommendError::InvalidModel(format!(
                        "node {index} does not exist"
                    )));
                }
            }
        }
    }
}

/// The crop recommender held in application state.
#[derive(Debug, Clone)]
pub enum CropRecommender {
    /// No fitted model is available.
    Unfitted,
    /// A fitted forest loaded at startup.
    Forest(RandomForest),
}

impl CropRecommender {
    /// Load the recommender from an optional exported forest.
    ///
    /// `None` yields [`CropRecommender::Unfitted`].
    ///
    /// # Errors
    ///
    /// Returns `RecommendError::Io`, `RecommendError::Parse` or
    /// `RecommendError::InvalidModel` if the file is unusable.
    pub fn load(path: Option<&Path>) -> Result<Self, RecommendError> {
        let Some(path) = path else {
            tracing::warn!("No crop recommendation model configured; recommendations are disabled");
            return Ok(Self::Unfitted);
        };

        let json = std::fs::read_to_string(path).map_err(|source| RecommendError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let forest = RandomForest::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            trees = forest.tree_count(),
            classes = forest.classes().len(),
            "Crop recommendation model loaded"
        );

        Ok(Self::Forest(forest))
    }

    /// Whether a fitted model is available.
    #[must_use]
    pub const fn is_fitted(&self) -> bool {
        matches!(self, Self::Forest(_))
    }

    /// Recommend a crop for the given features.
    ///
    /// # Errors
    ///
    /// Returns `RecommendError::NotFitted` when no model is loaded, otherwise
    /// see [`RandomForest::predict`].
    pub fn recommend(&self, features: &CropFeatures) -> Result<&str, RecommendError> {
        match self {
            Self::Unfitted => Err(RecommendError::NotFitted),
            Self::Forest(forest) => forest.predict(features),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Two-tree forest: low rainfall favours maize, clay soil favours rice.
    pub(crate) const FOREST_JSON: &str = r#"{
        "classes": ["maize", "rice"],
        "soil_types": ["clay", "loam", "sandy"],
        "trees": [
            { "nodes": [
                { "feature": 1, "threshold": 120.0, "left": 1, "right": 2 },
                { "value": [9.0, 1.0] },
                { "value": [1.0, 9.0] }
            ] },
            { "nodes": [
                { "feature": 0, "threshold": 0.5, "left": 1, "right": 2 },
                { "value": [0.0, 4.0] },
                { "value": [3.0, 1.0] }
            ] }
        ]
    }"#;

    pub(crate) fn features(soil_type: &str, rainfall: f64) -> CropFeatures {
        CropFeatures {
            soil_type: soil_type.to_string(),
            rainfall,
            temperature: 25.0,
            humidity: 70.0,
        }
    }

    fn forest() -> RandomForest {
        RandomForest::from_json(FOREST_JSON).unwrap()
    }

    #[test]
    fn test_unfitted_refuses() {
        let recommender = CropRecommender::Unfitted;
        assert!(!recommender.is_fitted());
        assert!(matches!(
            recommender.recommend(&features("loam", 50.0)),
            Err(RecommendError::NotFitted)
        ));
    }

    #[test]
    fn test_load_without_path_is_unfitted() {
        assert!(!CropRecommender::load(None).unwrap().is_fitted());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CropRecommender::load(Some(Path::new("no/such/forest.json"))).unwrap_err();
        assert!(matches!(err, RecommendError::Io { .. }));
    }

    #[test]
    fn test_forest_predictions() {
        let forest = forest();
        // loam, dry: tree 1 -> maize 0.9, tree 2 -> maize 0.75
        assert_eq!(forest.predict(&features("loam", 50.0)).unwrap(), "maize");
        // clay, wet: tree 1 -> rice 0.9, tree 2 -> rice 1.0
        assert_eq!(forest.predict(&features("clay", 200.0)).unwrap(), "rice");
        // sandy, wet: rice (0.9 + 0.25) / 2 beats maize (0.1 + 0.75) / 2
        assert_eq!(forest.predict(&features("sandy", 200.0)).unwrap(), "rice");
    }

    #[test]
    fn test_threshold_goes_left_when_equal() {
        // Equal to the threshold takes the left (maize-heavy) branch of tree 1
        assert_eq!(forest().predict(&features("loam", 120.0)).unwrap(), "maize");
    }

    #[test]
    fn test_unknown_soil_type() {
        let err = forest().predict(&features("peat", 50.0)).unwrap_err();
        assert!(matches!(err, RecommendError::UnknownSoilType(ref s) if s == "peat"));
    }

    #[test]
    fn test_non_finite_feature() {
        let err = forest().predict(&features("loam", f64::NAN)).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidFeature("rainfall")));
    }

    #[test]
    fn test_rejects_backward_child() {
        let json = r#"{
            "classes": ["maize"],
            "soil_types": ["loam"],
            "trees": [ { "nodes": [
                { "feature": 1, "threshold": 1.0, "left": 0, "right": 1 },
                { "value": [1.0] }
            ] } ]
        }"#;
        assert!(matches!(
            RandomForest::from_json(json),
            Err(RecommendError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_rejects_leaf_width_mismatch() {
        let json = r#"{
            "classes": ["maize", "rice"],
            "soil_types": ["loam"],
            "trees": [ { "nodes": [ { "value": [1.0] } ] } ]
        }"#;
        assert!(matches!(
            RandomForest::from_json(json),
            Err(RecommendError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RandomForest::from_json("{ not json"),
            Err(RecommendError::Parse(_))
        ));
    }
}
