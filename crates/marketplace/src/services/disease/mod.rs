//! Crop disease classification.
//!
//! An uploaded leaf photo is decoded, converted to RGB, resized to the
//! classifier's square input, scaled to `[0, 1]` and laid out NHWC with a batch
//! of one. The predicted disease is the arg-max of the classifier's scores.

mod onnx;

pub use onnx::OnnxClassifier;

use image::imageops::FilterType;
use thiserror::Error;

/// Number of colour channels fed to the classifier.
pub const CHANNELS: usize = 3;

/// Errors that can occur while classifying an image.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The upload is not a decodable image.
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The model file could not be loaded or optimized.
    #[error("failed to load model {path}: {message}")]
    Load { path: String, message: String },

    /// The model rejected the input or failed while running.
    #[error("model execution failed: {0}")]
    Model(String),

    /// The model produced no scores.
    #[error("model returned no scores")]
    EmptyOutput,
}

/// A preprocessed image batch of shape `[1, size, size, 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    size: u32,
    pixels: Vec<f32>,
}

impl ImageBatch {
    /// Side length of the square image.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Tensor shape in NHWC order.
    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        let side = self.size as usize;
        [1, side, side, CHANNELS]
    }

    /// Pixel values in `[0, 1]`, row-major, channels last.
    #[must_use]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// A pre-trained image classifier returning one score per disease class.
///
/// Implementations are shared across request threads and must not mutate
/// state while scoring.
pub trait DiseaseClassifier: Send + Sync {
    /// Square input size the classifier expects.
    fn image_size(&self) -> u32;

    /// Score every class for one preprocessed image.
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::Model` if the model fails to run.
    fn scores(&self, batch: &ImageBatch) -> Result<Vec<f32>, InferenceError>;
}

/// Decode and normalize an uploaded image.
///
/// # Errors
///
/// Returns `InferenceError::Decode` if the bytes are not a supported image.
pub fn preprocess(bytes: &[u8], size: u32) -> Result<ImageBatch, InferenceError> {
    let image = image::load_from_memory(bytes)?;
    let rgb = image
        .resize_exact(size, size, FilterType::CatmullRom)
        .to_rgb8();

    let pixels = rgb
        .pixels()
        .flat_map(|pixel| pixel.0)
        .map(|value| f32::from(value) / 255.0)
        .collect();

    Ok(ImageBatch { size, pixels })
}

/// Index of the highest score; the first one wins on ties.
#[must_use]
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Classify an uploaded image and return the predicted class index.
///
/// CPU bound; call from a blocking task.
///
/// # Errors
///
/// Returns `InferenceError::Decode` for unreadable uploads, and
/// `InferenceError::Model` or `InferenceError::EmptyOutput` when the
/// classifier fails.
pub fn predict(classifier: &dyn DiseaseClassifier, bytes: &[u8]) -> Result<usize, InferenceError> {
    let batch = preprocess(bytes, classifier.image_size())?;
    let scores = classifier.scores(&batch)?;
    argmax(&scores).ok_or(InferenceError::EmptyOutput)
}
