//! ONNX-backed disease classifier.

use std::path::Path;

use tract_onnx::prelude::*;

use super::{DiseaseClassifier, ImageBatch, InferenceError};

/// Classifier loaded from an ONNX export of the trained network.
///
/// The graph is specialised to a `[1, size, size, 3]` `f32` input at load
/// time and optimized once; the resulting plan is immutable and shared.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    image_size: u32,
}

impl OnnxClassifier {
    /// Load and optimize the model at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::Load` if the file is missing, is not a valid
    /// ONNX graph, or does not accept an NHWC image batch.
    pub fn load(path: &Path, image_size: u32) -> Result<Self, InferenceError> {
        let side = image_size as usize;
        let load_error = |e: TractError| InferenceError::Load {
            path: path.display().to_string(),
            message: format!("{e:#}"),
        };

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, side, side, 3]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(load_error)?;

        tracing::info!(path = %path.display(), image_size, "Disease model loaded");

        Ok(Self { plan, image_size })
    }
}

impl DiseaseClassifier for OnnxClassifier {
    fn image_size(&self) -> u32 {
        self.image_size
    }

    fn scores(&self, batch: &ImageBatch) -> Result<Vec<f32>, InferenceError> {
        let model_error = |e: TractError| InferenceError::Model(format!("{e:#}"));

        let input = Tensor::from_shape(&batch.shape(), batch.pixels()).map_err(model_error)?;
        let outputs = self.plan.run(tvec!(input.into())).map_err(model_error)?;
        let output = outputs.first().ok_or(InferenceError::EmptyOutput)?;
        let view = output.to_array_view::<f32>().map_err(model_error)?;

        Ok(view.iter().copied().collect())
    }
}
