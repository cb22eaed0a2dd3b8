use crate::{
    db::DbPool,
    entities::order::{self, Entity as OrderEntity},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const MAX_ETV_REASON_LEN: usize = 255;
pub const MAX_NOTES_LEN: usize = 2000;

/// Service for per-order point updates, each keyed by order number.
///
/// Every mutation is a single-row update; a number that matches no row
/// affects zero rows and is not an error. Callers that need existence
/// confirmation check the returned affected-row count.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    /// Creates a new order service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Retrieves an order by its number
    #[instrument(skip(self))]
    pub async fn get_order(&self, number: &str) -> Result<Option<order::Model>, ServiceError> {
        let db = &*self.db_pool;

        let order = OrderEntity::find_by_id(number.to_owned()).one(db).await?;
        if order.is_none() {
            debug!(number, "Order not found");
        }
        Ok(order)
    }

    /// Sets or clears the personal-use value factor of one order.
    ///
    /// Rejects negative factors; there is no upper bound.
    #[instrument(skip(self))]
    pub async fn set_etv_factor(
        &self,
        number: &str,
        factor: Option<Decimal>,
    ) -> Result<u64, ServiceError> {
        if let Some(factor) = factor {
            if factor < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "etv factor must be non-negative".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;
        let result = OrderEntity::update_many()
            .col_expr(order::Column::EtvFactor, Expr::value(factor))
            .filter(order::Column::Number.eq(number))
            .exec(db)
            .await?;

        info!(number, rows = result.rows_affected, "Updated etv factor");
        Ok(result.rows_affected)
    }

    /// Sets or clears the free-text justification for a non-default factor.
    ///
    /// An empty string is normalized to "absent", never stored as an empty
    /// string.
    #[instrument(skip(self, reason))]
    pub async fn set_etv_reason(
        &self,
        number: &str,
        reason: Option<String>,
    ) -> Result<u64, ServiceError> {
        let reason = reason.filter(|r| !r.is_empty());
        if let Some(reason) = &reason {
            if reason.chars().count() > MAX_ETV_REASON_LEN {
                return Err(ServiceError::ValidationError(format!(
                    "etv reason exceeds {MAX_ETV_REASON_LEN} characters"
                )));
            }
        }

        let db = &*self.db_pool;
        let result = OrderEntity::update_many()
            .col_expr(order::Column::EtvReason, Expr::value(reason))
            .filter(order::Column::Number.eq(number))
            .exec(db)
            .await?;

        info!(number, rows = result.rows_affected, "Updated etv reason");
        Ok(result.rows_affected)
    }

    /// Sets or clears the free-text notes of one order.
    #[instrument(skip(self, notes))]
    pub async fn set_notes(
        &self,
        number: &str,
        notes: Option<String>,
    ) -> Result<u64, ServiceError> {
        if let Some(notes) = &notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(ServiceError::ValidationError(format!(
                    "notes exceed {MAX_NOTES_LEN} characters"
                )));
            }
        }

        let db = &*self.db_pool;
        let result = OrderEntity::update_many()
            .col_expr(order::Column::Notes, Expr::value(notes))
            .filter(order::Column::Number.eq(number))
            .exec(db)
            .await?;

        info!(number, rows = result.rows_affected, "Updated notes");
        Ok(result.rows_affected)
    }
}
