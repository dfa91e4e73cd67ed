//! Order route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use farm_market_core::ProductId;

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Body returned after an order is stored.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";

/// Order form data.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub product_id: Option<String>,
}

/// Place-order page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/place.html")]
pub struct PlaceOrderTemplate;

/// Display the place-order form.
pub async fn place_order_page() -> impl IntoResponse {
    PlaceOrderTemplate
}

/// Record an order for the logged-in account.
///
/// Requests without a session are rejected by [`RequireAuth`] before the
/// form is read.
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<OrderForm>,
) -> Result<Response> {
    let Some(raw_id) = form.product_id else {
        return Ok(PlaceOrderTemplate.into_response());
    };

    let product_id: ProductId = raw_id
        .trim()
        .parse::<i32>()
        .map(ProductId::new)
        .map_err(|_| AppError::BadRequest(format!("invalid product id {raw_id:?}")))?;

    let order_id = OrderRepository::new(state.pool())
        .create(product_id, user.id)
        .await
        .map_err(|e| match e {
            RepositoryError::ForeignKey(_) => AppError::NotFound(format!("product {product_id}")),
            other => AppError::Database(other),
        })?;

    tracing::info!(
        order_id = %order_id,
        product_id = %product_id,
        consumer_id = %user.id,
        "Order placed"
    );
    Ok(ORDER_PLACED_MESSAGE.into_response())
}
