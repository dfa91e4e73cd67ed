//! Order repository.

use sqlx::PgPool;

use farm_market_core::{OrderId, ProductId, UserId};

use super::RepositoryError;

/// Repository for order writes.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record that `consumer_id` ordered `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the product or user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        product_id: ProductId,
        consumer_id: UserId,
    ) -> Result<OrderId, RepositoryError> {
        let id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (product_id, consumer_id)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(product_id)
        .bind(consumer_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "order"))?;

        Ok(id)
    }
}
