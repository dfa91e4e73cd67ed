//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use farm_market_core::Price;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::NewProduct;
use crate::state::AppState;

/// Body returned after a product is stored.
pub const PRODUCT_ADDED_MESSAGE: &str = "Product added successfully!";

const MAX_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Product form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
}

/// Add-product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/add.html")]
pub struct AddProductTemplate;

/// Display the add-product form.
pub async fn add_product_page() -> impl IntoResponse {
    AddProductTemplate
}

/// Insert a product into the catalog.
#[instrument(skip(state, form))]
pub async fn add_product(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let (Some(name), Some(description), Some(price)) = (form.name, form.description, form.price)
    else {
        return Ok(AddProductTemplate.into_response());
    };

    let product = validate_product(name, description, &price)?;
    let id = ProductRepository::new(state.pool()).create(&product).await?;

    tracing::info!(product_id = %id, price = %product.price, "Product added");
    Ok(PRODUCT_ADDED_MESSAGE.into_response())
}

fn validate_product(name: String, description: String, price: &str) -> Result<NewProduct> {
    let price = Price::parse(price).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::BadRequest(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::BadRequest(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }

    Ok(NewProduct {
        name,
        description,
        price,
    })
}
