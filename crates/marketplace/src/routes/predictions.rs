//! Model inference route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, State},
    response::IntoResponse,
};

use crate::error::{AppError, Result};
use crate::services::disease;
use crate::services::recommend::CropFeatures;
use crate::state::AppState;

/// Multipart field carrying the uploaded photo.
pub const IMAGE_FIELD: &str = "image";

/// Upload limit for `/predict_disease`.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Disease prediction page template.
#[derive(Template, WebTemplate)]
#[template(path = "predictions/disease.html")]
pub struct PredictDiseaseTemplate;

/// Crop recommendation page template.
#[derive(Template, WebTemplate)]
#[template(path = "predictions/crop.html")]
pub struct RecommendCropTemplate;

/// Display the disease upload form.
pub async fn predict_disease_page() -> impl IntoResponse {
    PredictDiseaseTemplate
}

/// Display the crop recommendation form.
pub async fn recommend_crop_page() -> impl IntoResponse {
    RecommendCropTemplate
}

/// Classify an uploaded leaf photo and return the class index.
pub async fn predict_disease(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String> {
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            image = Some(bytes);
            break;
        }
    }

    let bytes = image.ok_or_else(|| AppError::BadRequest("No image uploaded".to_string()))?;
    let classifier = state.disease();

    let class = tokio::task::spawn_blocking(move || disease::predict(classifier.as_ref(), &bytes))
        .await
        .map_err(|e| AppError::Internal(format!("Inference task failed: {e}")))??;

    tracing::info!(class, "Disease predicted");
    Ok(class.to_string())
}

/// Recommend a crop for the submitted soil and weather readings.
pub async fn recommend_crop(
    State(state): State<AppState>,
    Form(features): Form<CropFeatures>,
) -> Result<String> {
    let crop = state.recommender().recommend(&features)?;

    tracing::info!(soil_type = %features.soil_type, crop, "Crop recommended");
    Ok(crop.to_string())
}
